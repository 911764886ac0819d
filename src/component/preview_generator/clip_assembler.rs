//! 片段組裝器
//!
//! 把取樣區間實體化為長度一致、帶轉場標記的子片段。
//! 解碼與縮放交給 ffmpeg 子程序，縮放在片段擷取時一次完成，
//! 讓後續合成的每個輸入尺寸與幀率一致。

use super::sampler::SampleInterval;
use crate::config::Resolution;
use crate::error::PreviewError;
use crate::tools::run_ffmpeg;
use log::debug;
use std::path::{Path, PathBuf};

/// 兩段式 seek 的前置緩衝時間（秒）
const SEEK_MARGIN: f64 = 2.0;

/// 子片段統一輸出的幀率，合成時各輸入必須一致
pub const SEGMENT_FPS: u32 = 30;

/// 一個已正規化的子片段
///
/// `target_duration` 固定等於設定的片段長度；來源範圍不足時以
/// `pad_duration` 凍結末幀補齊，確保每段時間一致。
#[derive(Debug, Clone, PartialEq)]
pub struct SubClip {
    pub index: usize,
    pub source_start: f64,
    pub source_end: f64,
    pub target_duration: f64,
    /// 需要凍結末幀補齊的長度（秒），0 表示剛好填滿
    pub pad_duration: f64,
    pub has_fade_in: bool,
    pub has_fade_out: bool,
}

/// 規劃一個子片段（純計算，不碰媒體）
///
/// 轉場標記：第一段永不淡入，其餘皆淡入；所有片段（包含最後一段）
/// 都淡出——預覽結尾淡至黑是既定行為。
#[must_use]
pub fn plan_subclip(interval: &SampleInterval, index: usize, clip_duration: f64) -> SubClip {
    let decoded = interval.end - interval.start;
    SubClip {
        index,
        source_start: interval.start,
        source_end: interval.end,
        target_duration: clip_duration,
        pad_duration: (clip_duration - decoded).max(0.0),
        has_fade_in: index > 0,
        has_fade_out: true,
    }
}

/// 子片段在暫存資料夾內的檔名
#[must_use]
pub fn segment_path(temp_dir: &Path, subclip: &SubClip) -> PathBuf {
    temp_dir.join(format!("seg_{:03}.mp4", subclip.index))
}

/// 建立單一子片段的 ffmpeg 擷取參數
///
/// 兩段式 seek：`-ss` 在 `-i` 前快速跳到最近的關鍵幀，
/// `-i` 後的 `-ss` 再精準定位到目標時間點。
/// 濾鏡鏈把畫面縮放並填充到目標解析度、統一幀率，
/// 並在來源不足時以 tpad 凍結末幀補滿 `target_duration`。
#[must_use]
pub fn build_extract_args(
    video_path: &Path,
    subclip: &SubClip,
    resolution: Resolution,
    include_audio: bool,
    output_path: &Path,
) -> Vec<String> {
    let t0 = (subclip.source_start - SEEK_MARGIN).max(0.0);
    let delta = subclip.source_start - t0;

    let mut filter = format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:black,setsar=1,fps={SEGMENT_FPS}",
        w = resolution.width,
        h = resolution.height,
    );
    if subclip.pad_duration > 0.0 {
        // 凍結末幀補齊，而不是循環或報錯
        filter.push_str(&format!(
            ",tpad=stop_mode=clone:stop_duration={:.3}",
            subclip.pad_duration
        ));
    }

    let mut args = vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
    ];

    // 第一個 -ss（在 -i 前）：快速跳轉
    if t0 > 0.0 {
        args.push("-ss".to_string());
        args.push(format!("{t0:.3}"));
    }

    args.push("-i".to_string());
    args.push(video_path.to_string_lossy().to_string());

    // 第二個 -ss（在 -i 後）：精準定位
    if delta > 0.0 {
        args.push("-ss".to_string());
        args.push(format!("{delta:.3}"));
    }

    // 輸出長度鉗在 target_duration：來源提早結束時由 tpad 補滿，
    // 否則由 -t 截斷在取樣區間的終點
    args.extend([
        "-t".to_string(),
        format!("{:.3}", subclip.target_duration),
        "-vf".to_string(),
        filter,
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        "veryfast".to_string(),
        "-crf".to_string(),
        "18".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
    ]);

    if include_audio {
        args.extend([
            "-af".to_string(),
            format!(
                "aresample=async=1:first_pts=0,apad=whole_dur={:.3}",
                subclip.target_duration
            ),
            "-c:a".to_string(),
            "aac".to_string(),
            "-b:a".to_string(),
            "192k".to_string(),
        ]);
    } else {
        args.push("-an".to_string());
    }

    args.push("-y".to_string());
    args.push(output_path.to_string_lossy().to_string());

    args
}

/// 擷取並正規化一個子片段
pub fn extract_segment(
    video_path: &Path,
    subclip: &SubClip,
    resolution: Resolution,
    include_audio: bool,
    output_path: &Path,
) -> Result<(), PreviewError> {
    debug!(
        "擷取子片段 {}: {:.3}s-{:.3}s（補齊 {:.3}s）",
        subclip.index, subclip.source_start, subclip.source_end, subclip.pad_duration
    );

    let args = build_extract_args(video_path, subclip, resolution, include_audio, output_path);
    run_ffmpeg(&args).map_err(|stderr| {
        PreviewError::SourceRead(format!(
            "子片段 {}（{:.3}s-{:.3}s）: {stderr}",
            subclip.index, subclip.source_start, subclip.source_end
        ))
    })?;

    if !output_path.exists() {
        return Err(PreviewError::SourceRead(format!(
            "子片段檔案未建立: {}",
            output_path.display()
        )));
    }

    Ok(())
}
