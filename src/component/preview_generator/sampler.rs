//! 取樣器
//!
//! 根據影片長度與取樣策略產生有序的取樣區間序列。

use crate::config::SamplingMode;
use crate::error::PreviewError;
use rand::Rng;

/// 一個取樣區間，兩端都落在 [0, duration] 內
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleInterval {
    pub start: f64,
    pub end: f64,
}

/// 產生 count 個取樣區間
///
/// - 等距模式：start_i = i * duration / count，完全確定性
/// - 隨機模式：在 [0, max(0, duration - clip_duration)] 均勻抽選後
///   依 start 遞增排序——排序是硬性不變量，否則預覽會在時間軸上
///   來回跳動
///
/// 區間終點一律鉗制在影片結尾：end = min(start + clip_duration, duration)，
/// 絕不讀取超過來源結尾。因此尾端區間可能短於 clip_duration，
/// 由片段組裝器凍結末幀補齊。
pub fn sample_intervals(
    duration: f64,
    count: usize,
    clip_duration: f64,
    mode: SamplingMode,
) -> Result<Vec<SampleInterval>, PreviewError> {
    if duration <= 0.0 {
        return Err(PreviewError::InvalidConfiguration(format!(
            "影片長度必須大於 0（目前為 {duration}）"
        )));
    }
    if count == 0 {
        return Err(PreviewError::InvalidConfiguration(
            "片段數量至少為 1".to_string(),
        ));
    }
    if clip_duration <= 0.0 {
        return Err(PreviewError::InvalidConfiguration(format!(
            "片段長度必須大於 0（目前為 {clip_duration}）"
        )));
    }

    let starts: Vec<f64> = match mode {
        SamplingMode::Even => {
            let avg_interval = duration / count as f64;
            (0..count).map(|i| i as f64 * avg_interval).collect()
        }
        SamplingMode::Random => {
            let max_start = (duration - clip_duration).max(0.0);
            let mut rng = rand::rng();
            let mut starts: Vec<f64> = (0..count)
                .map(|_| rng.random_range(0.0..=max_start))
                .collect();
            // 依時間排序，維持「精華依序播放」的語意
            starts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            starts
        }
    };

    Ok(starts
        .into_iter()
        .map(|start| SampleInterval {
            start,
            end: (start + clip_duration).min(duration),
        })
        .collect())
}
