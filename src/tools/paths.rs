use crate::error::PreviewError;
use std::path::{Path, PathBuf};

/// 確認來源檔案存在
pub fn validate_file_exists(path: &Path) -> Result<(), PreviewError> {
    if !path.is_file() {
        return Err(PreviewError::SourceOpen(format!(
            "檔案不存在: {}",
            path.display()
        )));
    }
    Ok(())
}

/// 確保資料夾存在，不存在則建立
pub fn ensure_directory_exists(path: &Path) -> Result<(), PreviewError> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// 依來源檔名推導預設輸出路徑："{stem}_preview.{ext}"
#[must_use]
pub fn default_preview_path(video_path: &Path) -> PathBuf {
    let stem = video_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = video_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("mp4");
    let parent = video_path.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_preview.{ext}"))
}
