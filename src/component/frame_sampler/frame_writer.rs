//! 平行影格寫出
//!
//! 解碼後的原始影格交給 rayon 平行編碼為 JPEG。
//! 第一個寫入失敗會設下中止旗標，讓尚未開始的任務直接跳過；
//! 不論成敗，collect 會等所有已啟動的任務結束才回傳。

use super::stride::frame_file_name;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use indicatif::ProgressBar;
use log::error;
use rayon::prelude::*;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const JPEG_QUALITY: u8 = 90;

/// 一張已解碼的原始影格（RGB24）
pub struct RawFrame {
    /// 輸出序號（1 起算，對應檔名）
    pub output_index: usize,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// 單張影格的寫出結果
#[derive(Debug)]
pub struct FrameWriteResult {
    pub output_path: PathBuf,
    pub output_index: usize,
    pub success: bool,
    pub error_message: Option<String>,
}

/// 平行寫出所有影格
pub fn write_frames_parallel(frames: Vec<RawFrame>, output_dir: &Path) -> Vec<FrameWriteResult> {
    let abort = Arc::new(AtomicBool::new(false));
    let progress = ProgressBar::new(frames.len() as u64);

    let results: Vec<FrameWriteResult> = frames
        .par_iter()
        .map(|frame| {
            let output_path = output_dir.join(frame_file_name(frame.output_index));

            if abort.load(Ordering::SeqCst) {
                return FrameWriteResult {
                    output_path,
                    output_index: frame.output_index,
                    success: false,
                    error_message: Some("前一個寫入失敗，任務中止".to_string()),
                };
            }

            let result = write_frame(frame, &output_path);
            progress.inc(1);

            match result {
                Ok(()) => FrameWriteResult {
                    output_path,
                    output_index: frame.output_index,
                    success: true,
                    error_message: None,
                },
                Err(e) => {
                    abort.store(true, Ordering::SeqCst);
                    error!("影格寫出失敗 [{}]: {e}", frame.output_index);
                    FrameWriteResult {
                        output_path,
                        output_index: frame.output_index,
                        success: false,
                        error_message: Some(e),
                    }
                }
            }
        })
        .collect();

    progress.finish_and_clear();
    results
}

fn write_frame(frame: &RawFrame, output_path: &Path) -> Result<(), String> {
    let file = File::create(output_path)
        .map_err(|e| format!("無法建立檔案 {}: {e}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
        .encode(
            &frame.data,
            frame.width,
            frame.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| format!("JPEG 編碼失敗 {}: {e}", output_path.display()))?;

    Ok(())
}
