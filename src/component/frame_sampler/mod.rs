//! 影格擷取元件
//!
//! 三階段流程：
//! A. 取得影片資訊並計算取樣間隔
//! B. 單一解碼游標循序讀出選定影格
//! C. 平行編碼寫出 JPEG

mod frame_writer;
mod main;
mod stride;

pub use frame_writer::{FrameWriteResult, RawFrame, write_frames_parallel};
pub use main::{FrameSampler, extract_frames};
pub use stride::{compute_stride, frame_file_name, select_frame_indices};
