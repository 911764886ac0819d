//! 取樣間隔計算
//!
//! 以固定間隔在影格序號上取樣：stride = max(total / num, 1)，
//! 取序號為 stride 倍數的影格，最多 num 張。

/// 計算取樣間隔
#[must_use]
pub fn compute_stride(total_frames: u64, num_frames: usize) -> u64 {
    if num_frames == 0 {
        return 1;
    }
    (total_frames / num_frames as u64).max(1)
}

/// 選出要擷取的影格序號（0 起算，遞增）
#[must_use]
pub fn select_frame_indices(total_frames: u64, num_frames: usize) -> Vec<u64> {
    let stride = compute_stride(total_frames, num_frames);
    (0..total_frames)
        .filter(|n| n % stride == 0)
        .take(num_frames)
        .collect()
}

/// 輸出檔名（1 起算）："frame_001.jpg"
#[must_use]
pub fn frame_file_name(output_index: usize) -> String {
    format!("frame_{output_index:03}.jpg")
}
