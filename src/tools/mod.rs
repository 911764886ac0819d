mod ffmpeg_runner;
mod ffprobe_info;
mod paths;

pub use ffmpeg_runner::run_ffmpeg;
pub use ffprobe_info::{VideoInfo, get_video_info};
pub use paths::{default_preview_path, ensure_directory_exists, validate_file_exists};
