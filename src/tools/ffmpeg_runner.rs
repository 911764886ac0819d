use log::debug;
use std::process::Command;

/// 執行一個 ffmpeg 命令並等待結束
///
/// 失敗時回傳 stderr 內容，由呼叫端對應到自己的錯誤分類。
pub fn run_ffmpeg(args: &[String]) -> Result<(), String> {
    debug!("ffmpeg {}", args.join(" "));

    let output = Command::new("ffmpeg")
        .args(args)
        .output()
        .map_err(|e| format!("無法執行 ffmpeg: {e}"))?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(stderr.trim().to_string())
    }
}
