//! 管線整合測試
//!
//! 只驗證純計算部分，不依賴 ffmpeg。

use std::path::{Path, PathBuf};

use video_preview_generator::component::frame_sampler::{
    compute_stride, frame_file_name, select_frame_indices,
};
use video_preview_generator::component::preview_generator::{
    build_compose_args, compose_offsets, plan_subclip, sample_intervals, total_duration,
};
use video_preview_generator::config::{SamplingMode, TransitionProfile};
use video_preview_generator::error::PreviewError;

/// 等距模式從頭到尾都是確定性的：兩次執行產生相同的規劃
#[test]
fn test_even_pipeline_is_deterministic() {
    let plan = |duration: f64| {
        sample_intervals(duration, 5, 2.0, SamplingMode::Even)
            .unwrap()
            .iter()
            .enumerate()
            .map(|(i, interval)| plan_subclip(interval, i, 2.0))
            .collect::<Vec<_>>()
    };

    assert_eq!(plan(123.45), plan(123.45));
}

/// 10 秒影片、5 段、每段 2 秒：剛好填滿，無需補齊
#[test]
fn test_exact_fit_scenario() {
    let intervals = sample_intervals(10.0, 5, 2.0, SamplingMode::Even).unwrap();
    let subclips: Vec<_> = intervals
        .iter()
        .enumerate()
        .map(|(i, interval)| plan_subclip(interval, i, 2.0))
        .collect();

    for subclip in &subclips {
        assert!(subclip.pad_duration.abs() < 1e-9);
        assert!((subclip.target_duration - 2.0).abs() < 1e-9);
    }

    // 預設轉場不重疊：總長恰為 10 秒
    let profile = TransitionProfile::default();
    let total = total_duration(subclips.len(), 2.0, profile.overlap());
    assert!((total - 10.0).abs() < 1e-9);
}

/// 9 秒影片：最後一段解碼範圍不足，靠凍結末幀補回 2 秒
#[test]
fn test_clamped_tail_scenario() {
    let intervals = sample_intervals(9.0, 5, 2.0, SamplingMode::Even).unwrap();
    let subclips: Vec<_> = intervals
        .iter()
        .enumerate()
        .map(|(i, interval)| plan_subclip(interval, i, 2.0))
        .collect();

    let last = subclips.last().unwrap();
    assert!(last.source_end <= 9.0 + 1e-9, "絕不讀取超過來源結尾");
    assert!((last.pad_duration - 0.2).abs() < 1e-9);

    // 補齊後每段仍是 2 秒，總長不受來源長度影響
    let total = total_duration(subclips.len(), 2.0, 0.0);
    assert!((total - 10.0).abs() < 1e-9);
}

/// 轉場規則：第一段不淡入，所有片段都淡出
#[test]
fn test_fade_invariants() {
    let intervals = sample_intervals(60.0, 5, 2.0, SamplingMode::Even).unwrap();
    let subclips: Vec<_> = intervals
        .iter()
        .enumerate()
        .map(|(i, interval)| plan_subclip(interval, i, 2.0))
        .collect();

    assert!(!subclips[0].has_fade_in);
    assert!(subclips[1..].iter().all(|s| s.has_fade_in));
    assert!(subclips.iter().all(|s| s.has_fade_out));
}

#[test]
fn test_zero_duration_rejected() {
    assert!(matches!(
        sample_intervals(0.0, 5, 2.0, SamplingMode::Even),
        Err(PreviewError::InvalidConfiguration(_))
    ));
}

/// 合成位移：5 段、每段 2 秒、無重疊
#[test]
fn test_compose_offsets_and_total() {
    let offsets = compose_offsets(5, 2.0, 0.0);
    let expected = [0.0, 2.0, 4.0, 6.0, 8.0];
    for (offset, expected) in offsets.iter().zip(expected) {
        assert!((offset - expected).abs() < 1e-9);
    }
    assert!((total_duration(5, 2.0, 0.0) - 10.0).abs() < 1e-9);

    // 重疊 0.5 秒：每個轉場各省下 0.5 秒
    assert!((total_duration(5, 2.0, 0.5) - 8.0).abs() < 1e-9);
}

/// 空的時間軸在編碼前就被拒絕
#[test]
fn test_empty_timeline_rejected() {
    let result = build_compose_args(
        &[],
        &[],
        &TransitionProfile::default(),
        2.0,
        true,
        Path::new("/tmp/out.mp4"),
    );
    assert!(matches!(result, Err(PreviewError::EmptyTimeline)));
}

/// 輸出編碼參數依是否包含音訊切換
#[test]
fn test_compose_audio_parameters() {
    let intervals = sample_intervals(10.0, 3, 2.0, SamplingMode::Even).unwrap();
    let subclips: Vec<_> = intervals
        .iter()
        .enumerate()
        .map(|(i, interval)| plan_subclip(interval, i, 2.0))
        .collect();
    let paths: Vec<PathBuf> = (0..3)
        .map(|i| PathBuf::from(format!("/tmp/seg_{i:03}.mp4")))
        .collect();

    let with_audio = build_compose_args(
        &paths,
        &subclips,
        &TransitionProfile::default(),
        2.0,
        true,
        Path::new("/tmp/out.mp4"),
    )
    .unwrap();
    assert!(with_audio.iter().any(|a| a == "aac"));
    assert!(with_audio.iter().any(|a| a == "192k"));
    assert!(with_audio.iter().any(|a| a == "libx264"));

    let without_audio = build_compose_args(
        &paths,
        &subclips,
        &TransitionProfile::default(),
        2.0,
        false,
        Path::new("/tmp/out.mp4"),
    )
    .unwrap();
    assert!(without_audio.iter().any(|a| a == "-an"));
}

/// 影格擷取的取樣計算：間隔、序號與檔名
#[test]
fn test_frame_sampling_grid() {
    assert_eq!(compute_stride(100, 10), 10);

    let indices = select_frame_indices(100, 10);
    assert_eq!(indices.len(), 10);
    assert_eq!(indices, vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90]);

    let names: Vec<String> = (1..=indices.len()).map(frame_file_name).collect();
    assert_eq!(names.first().unwrap(), "frame_001.jpg");
    assert_eq!(names.last().unwrap(), "frame_010.jpg");

    // 檔名不重複
    let mut unique = names.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), names.len());
}
