//! 功能元件模組
//!
//! 每個子模組實現一條獨立的管線，包含主要邏輯和專用工具

pub mod frame_sampler;
pub mod preview_generator;

pub use frame_sampler::FrameSampler;
pub use preview_generator::PreviewGenerator;
