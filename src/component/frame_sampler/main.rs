use super::frame_writer::{RawFrame, write_frames_parallel};
use super::stride::{compute_stride, select_frame_indices};
use crate::config::save::{add_recent_path, save_settings};
use crate::config::{Config, FrameSampleConfig};
use crate::error::PreviewError;
use crate::tools::{ensure_directory_exists, get_video_info, validate_file_exists};
use anyhow::Result;
use console::style;
use dialoguer::Input;
use log::{debug, info, warn};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// 依固定間隔擷取影格並輸出 JPEG
///
/// 單一 ffmpeg 解碼游標循序讀出選定影格，讀完後平行編碼寫出。
/// 回傳實際寫出的影格數。
pub fn extract_frames(
    video_path: &Path,
    config: &FrameSampleConfig,
) -> Result<usize, PreviewError> {
    config.validate()?;
    validate_file_exists(video_path)?;
    ensure_directory_exists(&config.output_dir)?;

    let video_info = get_video_info(video_path)?;
    if video_info.frame_count == 0 {
        return Err(PreviewError::InvalidConfiguration(format!(
            "影片沒有任何影格: {}",
            video_path.display()
        )));
    }

    let stride = compute_stride(video_info.frame_count, config.num_frames);
    let expected = select_frame_indices(video_info.frame_count, config.num_frames).len();

    debug!(
        "擷取影格: 總數 {}，間隔 {stride}，預期 {expected} 張",
        video_info.frame_count
    );

    let frames = decode_selected_frames(
        video_path,
        stride,
        expected,
        video_info.width,
        video_info.height,
    )?;

    if frames.is_empty() {
        return Err(PreviewError::SourceRead(format!(
            "沒有解碼出任何影格: {}",
            video_path.display()
        )));
    }

    let results = write_frames_parallel(frames, &config.output_dir);

    if let Some(failure) = results.iter().find(|r| !r.success) {
        return Err(PreviewError::FrameWrite(format!(
            "{}: {}",
            failure.output_path.display(),
            failure
                .error_message
                .clone()
                .unwrap_or_else(|| "未知錯誤".to_string())
        )));
    }

    info!(
        "已擷取 {} 張影格到 {}",
        results.len(),
        config.output_dir.display()
    );

    Ok(results.len())
}

/// 以單一解碼游標讀出選定影格
///
/// select 濾鏡只放行序號為 stride 倍數的影格，`-vsync 0` 保留
/// 原始序，輸出為原始 RGB24 位元流，依固定影格大小循序切割。
fn decode_selected_frames(
    video_path: &Path,
    stride: u64,
    expected: usize,
    width: u32,
    height: u32,
) -> Result<Vec<RawFrame>, PreviewError> {
    let mut child = Command::new("ffmpeg")
        .args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-i",
        ])
        .arg(video_path)
        .args([
            "-vf",
            &format!("select=not(mod(n\\,{stride}))"),
            "-vsync",
            "0",
            "-frames:v",
            &expected.to_string(),
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-",
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| PreviewError::SourceOpen(format!("無法執行 ffmpeg: {e}")))?;

    let frame_size = (width as usize) * (height as usize) * 3;
    let mut frames = Vec::with_capacity(expected);
    let read_result = (|| -> std::io::Result<()> {
        let mut stdout = child.stdout.take().ok_or_else(|| {
            std::io::Error::other("無法取得 ffmpeg 輸出管線")
        })?;

        for output_index in 1..=expected {
            let mut data = vec![0u8; frame_size];
            if !read_exact_or_eof(&mut stdout, &mut data)? {
                // 來源提早結束：已讀到的影格仍然有效
                break;
            }
            frames.push(RawFrame {
                output_index,
                width,
                height,
                data,
            });
        }
        Ok(())
    })();

    if let Err(e) = read_result {
        let _ = child.kill();
        let _ = child.wait();
        return Err(PreviewError::SourceRead(format!(
            "讀取影格資料失敗: {e}"
        )));
    }

    let status = child
        .wait()
        .map_err(|e| PreviewError::SourceRead(format!("等待 ffmpeg 結束失敗: {e}")))?;

    if !status.success() && frames.is_empty() {
        let stderr = child
            .stderr
            .take()
            .and_then(|mut s| {
                let mut buf = String::new();
                s.read_to_string(&mut buf).ok().map(|_| buf)
            })
            .unwrap_or_default();
        return Err(PreviewError::SourceRead(format!(
            "ffmpeg 解碼失敗: {}",
            stderr.trim()
        )));
    }

    Ok(frames)
}

/// 讀滿整個緩衝區；在影格邊界上的 EOF 回傳 Ok(false)，
/// 影格中途截斷視為錯誤
fn read_exact_or_eof(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(false);
            }
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "影格資料不完整",
            ));
        }
        filled += n;
    }
    Ok(true)
}

/// 互動式影格擷取器
pub struct FrameSampler {
    config: Config,
}

impl FrameSampler {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&mut self) -> Result<()> {
        println!("{}", style("=== 擷取影格 ===").cyan().bold());

        let video_path = self.prompt_video_path()?;
        validate_file_exists(&video_path)?;

        let num_frames: usize = Input::new()
            .with_prompt("要擷取的影格數量")
            .default(self.config.settings.num_frames)
            .interact_text()?;

        let output_dir: String = Input::new()
            .with_prompt("輸出資料夾")
            .default("frames".to_string())
            .interact_text()?;

        let sample_config = FrameSampleConfig {
            num_frames,
            output_dir: PathBuf::from(output_dir.trim()),
        };

        self.config.settings.num_frames = num_frames;
        add_recent_path(&mut self.config.settings, &video_path.to_string_lossy());
        if let Err(e) = save_settings(&self.config.settings) {
            warn!("無法儲存偏好設定: {e}");
        }

        println!();
        println!("{}", style("開始擷取影格...").cyan());

        let count = extract_frames(&video_path, &sample_config)?;

        println!(
            "{} 已擷取 {} 張影格到 {}",
            style("✓").green(),
            count,
            style(sample_config.output_dir.display()).bold()
        );

        Ok(())
    }

    fn prompt_video_path(&self) -> Result<PathBuf> {
        let mut input = Input::new().with_prompt("請輸入影片檔案路徑");
        if let Some(recent) = self.config.settings.recent_paths.first() {
            input = input.default(recent.clone());
        }
        let path: String = input.interact_text()?;
        Ok(PathBuf::from(path.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_exact_or_eof_full_frame() {
        let mut cursor = Cursor::new(vec![7u8; 12]);
        let mut buf = vec![0u8; 12];
        assert!(read_exact_or_eof(&mut cursor, &mut buf).unwrap());
        assert_eq!(buf, vec![7u8; 12]);
    }

    #[test]
    fn test_read_exact_or_eof_clean_eof() {
        let mut cursor = Cursor::new(Vec::<u8>::new());
        let mut buf = vec![0u8; 12];
        assert!(!read_exact_or_eof(&mut cursor, &mut buf).unwrap());
    }

    #[test]
    fn test_read_exact_or_eof_truncated_frame() {
        // 只剩半張影格：中途 EOF 是錯誤
        let mut cursor = Cursor::new(vec![7u8; 6]);
        let mut buf = vec![0u8; 12];
        let err = read_exact_or_eof(&mut cursor, &mut buf).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
