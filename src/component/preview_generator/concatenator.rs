//! 合成器
//!
//! 以「compose」語意把子片段排上單一時間軸：相鄰片段的轉場包絡
//! 可以在重疊窗內交疊（而非硬切），維持輸入順序即播放順序，
//! 最後交給 ffmpeg 編碼輸出。

use super::clip_assembler::SubClip;
use crate::config::TransitionProfile;
use crate::error::PreviewError;
use crate::tools::run_ffmpeg;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// 輸出編碼參數（沿用固定組合：libx264 + aac 192k）
const VIDEO_CODEC: &str = "libx264";
const AUDIO_CODEC: &str = "aac";
const AUDIO_BITRATE: &str = "192k";

/// 每個子片段在合成時間軸上的起點
///
/// offset_{i+1} = offset_i + clip_duration - overlap。
/// overlap 為 0 時片段首尾相接，總長恰為 count * clip_duration。
#[must_use]
pub fn compose_offsets(count: usize, clip_duration: f64, overlap: f64) -> Vec<f64> {
    (0..count)
        .map(|i| i as f64 * (clip_duration - overlap))
        .collect()
}

/// 合成後的總長度
#[must_use]
pub fn total_duration(count: usize, clip_duration: f64, overlap: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    count as f64 * clip_duration - (count as f64 - 1.0) * overlap
}

/// 建立合成與編碼的完整 ffmpeg 參數
///
/// overlap == 0：每段各自帶淡入淡出包絡，concat 濾鏡依序接上；
/// overlap > 0：xfade / acrossfade 讓前段淡出與後段淡入在重疊窗內
/// 交疊，結尾再補整體淡出。空的子片段列表在嘗試任何編碼前
/// 回報 `EmptyTimeline`。
pub fn build_compose_args(
    segment_paths: &[PathBuf],
    subclips: &[SubClip],
    profile: &TransitionProfile,
    clip_duration: f64,
    include_audio: bool,
    output_path: &Path,
) -> Result<Vec<String>, PreviewError> {
    if subclips.is_empty() {
        return Err(PreviewError::EmptyTimeline);
    }

    let mut args = vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
    ];
    for path in segment_paths {
        args.push("-i".to_string());
        args.push(path.to_string_lossy().to_string());
    }

    let overlap = profile.overlap();
    let filter = if overlap > 0.0 && subclips.len() > 1 {
        build_xfade_filter(subclips, profile, clip_duration, include_audio)
    } else {
        build_concat_filter(subclips, profile, clip_duration, include_audio)
    };

    args.extend(["-filter_complex".to_string(), filter]);
    args.extend(["-map".to_string(), "[vout]".to_string()]);

    if include_audio {
        args.extend([
            "-map".to_string(),
            "[aout]".to_string(),
            "-c:a".to_string(),
            AUDIO_CODEC.to_string(),
            "-b:a".to_string(),
            AUDIO_BITRATE.to_string(),
        ]);
    } else {
        args.push("-an".to_string());
    }

    args.extend([
        "-c:v".to_string(),
        VIDEO_CODEC.to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
        "-y".to_string(),
        output_path.to_string_lossy().to_string(),
    ]);

    Ok(args)
}

/// 無重疊時的濾鏡圖：各段帶自己的淡入淡出，concat 依序接上
fn build_concat_filter(
    subclips: &[SubClip],
    profile: &TransitionProfile,
    clip_duration: f64,
    include_audio: bool,
) -> String {
    let fade_out_start = (clip_duration - profile.fade_out_duration).max(0.0);
    let mut parts = Vec::new();

    for (i, subclip) in subclips.iter().enumerate() {
        let mut vf = Vec::new();
        if subclip.has_fade_in && profile.fade_in_duration > 0.0 {
            vf.push(format!("fade=t=in:st=0:d={:.3}", profile.fade_in_duration));
        }
        if subclip.has_fade_out && profile.fade_out_duration > 0.0 {
            vf.push(format!(
                "fade=t=out:st={fade_out_start:.3}:d={:.3}",
                profile.fade_out_duration
            ));
        }
        let chain = if vf.is_empty() {
            "null".to_string()
        } else {
            vf.join(",")
        };
        parts.push(format!("[{i}:v]{chain}[v{i}]"));

        if include_audio {
            let mut af = Vec::new();
            if subclip.has_fade_in && profile.fade_in_duration > 0.0 {
                af.push(format!("afade=t=in:st=0:d={:.3}", profile.fade_in_duration));
            }
            if subclip.has_fade_out && profile.fade_out_duration > 0.0 {
                af.push(format!(
                    "afade=t=out:st={fade_out_start:.3}:d={:.3}",
                    profile.fade_out_duration
                ));
            }
            let chain = if af.is_empty() {
                "anull".to_string()
            } else {
                af.join(",")
            };
            parts.push(format!("[{i}:a]{chain}[a{i}]"));
        }
    }

    let n = subclips.len();
    let mut concat_inputs = String::new();
    for i in 0..n {
        concat_inputs.push_str(&format!("[v{i}]"));
        if include_audio {
            concat_inputs.push_str(&format!("[a{i}]"));
        }
    }
    if include_audio {
        parts.push(format!("{concat_inputs}concat=n={n}:v=1:a=1[vout][aout]"));
    } else {
        parts.push(format!("{concat_inputs}concat=n={n}:v=1:a=0[vout]"));
    }

    parts.join(";")
}

/// 重疊時的濾鏡圖：xfade / acrossfade 串接相鄰片段
///
/// xfade 的 offset 即下一段在合成時間軸上的起點；
/// 各輸入段已正規化為相同尺寸與幀率，這是 xfade 的前提。
fn build_xfade_filter(
    subclips: &[SubClip],
    profile: &TransitionProfile,
    clip_duration: f64,
    include_audio: bool,
) -> String {
    let n = subclips.len();
    let overlap = profile.overlap();
    let offsets = compose_offsets(n, clip_duration, overlap);
    let total = total_duration(n, clip_duration, overlap);
    let fade_out_start = (total - profile.fade_out_duration).max(0.0);
    let mut parts = Vec::new();

    let mut prev = "0:v".to_string();
    for i in 1..n {
        let out = if i == n - 1 {
            "vx".to_string()
        } else {
            format!("vx{i}")
        };
        parts.push(format!(
            "[{prev}][{i}:v]xfade=transition=fade:duration={overlap:.3}:offset={:.3}[{out}]",
            offsets[i]
        ));
        prev = out;
    }
    // 最後一段的淡出維持既定行為：預覽結尾淡至黑
    parts.push(format!(
        "[vx]fade=t=out:st={fade_out_start:.3}:d={:.3}[vout]",
        profile.fade_out_duration
    ));

    if include_audio {
        let mut prev = "0:a".to_string();
        for i in 1..n {
            let out = if i == n - 1 {
                "ax".to_string()
            } else {
                format!("ax{i}")
            };
            parts.push(format!("[{prev}][{i}:a]acrossfade=d={overlap:.3}[{out}]"));
            prev = out;
        }
        parts.push(format!(
            "[ax]afade=t=out:st={fade_out_start:.3}:d={:.3}[aout]",
            profile.fade_out_duration
        ));
    }

    parts.join(";")
}

/// 合成並編碼輸出
pub fn concatenate(
    segment_paths: &[PathBuf],
    subclips: &[SubClip],
    profile: &TransitionProfile,
    clip_duration: f64,
    include_audio: bool,
    output_path: &Path,
) -> Result<(), PreviewError> {
    let args = build_compose_args(
        segment_paths,
        subclips,
        profile,
        clip_duration,
        include_audio,
        output_path,
    )?;

    debug!(
        "合成 {} 個子片段 -> {}",
        subclips.len(),
        output_path.display()
    );

    run_ffmpeg(&args).map_err(PreviewError::Encode)?;

    if !output_path.exists() {
        return Err(PreviewError::Encode(format!(
            "輸出檔案未建立: {}",
            output_path.display()
        )));
    }

    info!("預覽影片已建立: {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::preview_generator::plan_subclip;
    use crate::component::preview_generator::sampler::SampleInterval;

    fn make_subclips(count: usize, clip_duration: f64) -> Vec<SubClip> {
        (0..count)
            .map(|i| {
                let start = i as f64 * clip_duration;
                plan_subclip(
                    &SampleInterval {
                        start,
                        end: start + clip_duration,
                    },
                    i,
                    clip_duration,
                )
            })
            .collect()
    }

    fn make_paths(count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| PathBuf::from(format!("/tmp/seg_{i:03}.mp4")))
            .collect()
    }

    #[test]
    fn test_compose_offsets_no_overlap() {
        let offsets = compose_offsets(5, 2.0, 0.0);
        let expected = [0.0, 2.0, 4.0, 6.0, 8.0];
        for (offset, expected) in offsets.iter().zip(expected) {
            assert!((offset - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_compose_offsets_with_overlap() {
        let offsets = compose_offsets(3, 2.0, 0.5);
        let expected = [0.0, 1.5, 3.0];
        for (offset, expected) in offsets.iter().zip(expected) {
            assert!((offset - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_total_duration() {
        // 無重疊：總長恰為 count * clip_duration
        assert!((total_duration(5, 2.0, 0.0) - 10.0).abs() < 1e-9);
        // 有重疊：每個轉場各省下 overlap
        assert!((total_duration(3, 2.0, 0.5) - 5.0).abs() < 1e-9);
        assert!(total_duration(0, 2.0, 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_timeline_rejected_before_encode() {
        let result = build_compose_args(
            &[],
            &[],
            &TransitionProfile::default(),
            2.0,
            false,
            Path::new("/tmp/out.mp4"),
        );
        assert!(matches!(result, Err(PreviewError::EmptyTimeline)));
    }

    #[test]
    fn test_default_profile_uses_concat_with_fade_outs() {
        let subclips = make_subclips(3, 2.0);
        let args = build_compose_args(
            &make_paths(3),
            &subclips,
            &TransitionProfile::default(),
            2.0,
            false,
            Path::new("/tmp/out.mp4"),
        )
        .unwrap();

        let filter = args[args.iter().position(|a| a == "-filter_complex").unwrap() + 1].clone();
        assert!(filter.contains("concat=n=3:v=1:a=0[vout]"));
        // 每段都淡出，起點在 clip_duration - fade_out
        assert_eq!(filter.matches("fade=t=out:st=1.500:d=0.500").count(), 3);
        // 預設淡入為 0，不應出現淡入濾鏡
        assert!(!filter.contains("fade=t=in"));
    }

    #[test]
    fn test_positive_fade_in_uses_xfade_chain() {
        let subclips = make_subclips(3, 2.0);
        let profile = TransitionProfile {
            fade_in_duration: 0.5,
            fade_out_duration: 0.5,
        };
        let args = build_compose_args(
            &make_paths(3),
            &subclips,
            &profile,
            2.0,
            false,
            Path::new("/tmp/out.mp4"),
        )
        .unwrap();

        let filter = args[args.iter().position(|a| a == "-filter_complex").unwrap() + 1].clone();
        // 兩個轉場，offset 分別是第二、第三段的起點
        assert!(filter.contains("xfade=transition=fade:duration=0.500:offset=1.500"));
        assert!(filter.contains("xfade=transition=fade:duration=0.500:offset=3.000"));
        // 結尾整體淡出：總長 5.0 - 0.5
        assert!(filter.contains("fade=t=out:st=4.500:d=0.500[vout]"));
    }

    #[test]
    fn test_audio_encode_parameters() {
        let subclips = make_subclips(2, 2.0);

        let with_audio = build_compose_args(
            &make_paths(2),
            &subclips,
            &TransitionProfile::default(),
            2.0,
            true,
            Path::new("/tmp/out.mp4"),
        )
        .unwrap();
        assert!(with_audio.iter().any(|a| a == "192k"));
        assert!(with_audio.iter().any(|a| a == "aac"));
        let filter =
            with_audio[with_audio.iter().position(|a| a == "-filter_complex").unwrap() + 1].clone();
        assert!(filter.contains("concat=n=2:v=1:a=1[vout][aout]"));
        assert!(filter.contains("afade=t=out"));

        let without_audio = build_compose_args(
            &make_paths(2),
            &subclips,
            &TransitionProfile::default(),
            2.0,
            false,
            Path::new("/tmp/out.mp4"),
        )
        .unwrap();
        assert!(without_audio.iter().any(|a| a == "-an"));
    }

    #[test]
    fn test_input_order_matches_subclip_order() {
        let subclips = make_subclips(3, 2.0);
        let paths = make_paths(3);
        let args = build_compose_args(
            &paths,
            &subclips,
            &TransitionProfile::default(),
            2.0,
            false,
            Path::new("/tmp/out.mp4"),
        )
        .unwrap();

        let inputs: Vec<&String> = args
            .iter()
            .enumerate()
            .filter(|(i, _)| *i > 0 && args[i - 1] == "-i")
            .map(|(_, a)| a)
            .collect();
        assert_eq!(inputs.len(), 3);
        for (input, path) in inputs.iter().zip(&paths) {
            assert_eq!(**input, path.to_string_lossy().to_string());
        }
    }
}
