//! 影片預覽產生元件
//!
//! 四階段流程：
//! A. 取得影片資訊（ffprobe）
//! B. 取樣（等距或隨機）
//! C. 擷取並正規化子片段
//! D. 合成時間軸並編碼輸出

mod clip_assembler;
mod concatenator;
mod main;
mod sampler;

pub use clip_assembler::{SEGMENT_FPS, SubClip, build_extract_args, plan_subclip, segment_path};
pub use concatenator::{build_compose_args, compose_offsets, concatenate, total_duration};
pub use main::{PreviewGenerator, PreviewReport, create_video_preview};
pub use sampler::{SampleInterval, sample_intervals};
