//! 命令列介面
//!
//! 提供 `-v` 時走無互動模式，否則進入互動式選單。

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// 執行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// 產生預覽影片
    Preview,
    /// 擷取影格為 JPEG
    Frames,
}

#[derive(Debug, Parser)]
#[command(name = "video_preview_generator", about = "影片預覽產生器", version)]
pub struct Cli {
    /// 影片檔案路徑（不提供時進入互動式選單）
    #[arg(short = 'v', long)]
    pub video_path: Option<PathBuf>,

    /// 輸出檔案路徑（預設為 {stem}_preview.{ext}）
    #[arg(short = 'o', long)]
    pub output_file_name: Option<PathBuf>,

    /// 每段片段長度（秒）
    #[arg(short = 'c', long, default_value_t = 2.0)]
    pub clip_duration: f64,

    /// 片段數量
    #[arg(short = 'n', long, default_value_t = 5)]
    pub num_clips: usize,

    /// 輸出解析度（WIDTHxHEIGHT）
    #[arg(short = 'r', long, default_value = "1280x720")]
    pub resolution: String,

    /// 是否包含音訊
    #[arg(short = 'a', long)]
    pub include_audio: bool,

    /// 隨機選取片段（預設為等距取樣）
    #[arg(long)]
    pub random_selection: bool,

    /// 執行模式
    #[arg(long, value_enum, default_value_t = RunMode::Preview)]
    pub mode: RunMode,

    /// 影格擷取模式下要擷取的影格數量
    #[arg(long, default_value_t = 10)]
    pub num_frames: usize,

    /// 影格擷取模式下的輸出資料夾
    #[arg(long, default_value = "frames")]
    pub output_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["video_preview_generator"]);
        assert!(cli.video_path.is_none());
        assert!((cli.clip_duration - 2.0).abs() < 1e-9);
        assert_eq!(cli.num_clips, 5);
        assert_eq!(cli.resolution, "1280x720");
        assert!(!cli.include_audio);
        assert!(!cli.random_selection);
        assert_eq!(cli.mode, RunMode::Preview);
        assert_eq!(cli.num_frames, 10);
        assert_eq!(cli.output_dir, PathBuf::from("frames"));
    }

    #[test]
    fn test_cli_frames_mode() {
        let cli = Cli::parse_from([
            "video_preview_generator",
            "-v",
            "/videos/test.mp4",
            "--mode",
            "frames",
            "--num-frames",
            "20",
        ]);
        assert_eq!(cli.video_path, Some(PathBuf::from("/videos/test.mp4")));
        assert_eq!(cli.mode, RunMode::Frames);
        assert_eq!(cli.num_frames, 20);
    }
}
