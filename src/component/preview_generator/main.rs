use super::clip_assembler::{SubClip, extract_segment, plan_subclip, segment_path};
use super::concatenator::{concatenate, total_duration};
use super::sampler::sample_intervals;
use crate::config::{Config, PreviewConfig, Resolution, TransitionProfile};
use crate::config::save::{add_recent_path, save_settings};
use crate::error::PreviewError;
use crate::tools::{default_preview_path, ensure_directory_exists, get_video_info, validate_file_exists};
use anyhow::Result;
use console::style;
use dialoguer::{Confirm, Input};
use indicatif::ProgressBar;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 預覽產生結果
#[derive(Debug)]
pub struct PreviewReport {
    pub output_path: PathBuf,
    pub clip_count: usize,
    /// 依設定推得的輸出長度（秒）
    pub expected_duration: f64,
}

/// 產生一支預覽影片
///
/// 完整管線：探測來源、取樣、逐段擷取正規化、合成編碼。
/// 暫存片段放在輸出檔旁的 `.tmp_{stem}` 資料夾，
/// 無論成功或失敗都會清理。
pub fn create_video_preview(
    video_path: &Path,
    output_path: &Path,
    config: &PreviewConfig,
    profile: &TransitionProfile,
) -> Result<PreviewReport, PreviewError> {
    config.validate()?;
    validate_file_exists(video_path)?;

    let video_info = get_video_info(video_path)?;
    if video_info.duration_seconds <= 0.0 {
        return Err(PreviewError::InvalidConfiguration(format!(
            "影片長度無效: {:.3}s",
            video_info.duration_seconds
        )));
    }

    // 來源沒有音訊串流時降級為無聲輸出，而不是失敗
    let mut include_audio = config.include_audio;
    if include_audio && video_info.audio_codec.is_none() {
        warn!(
            "來源沒有音訊串流，改為無聲輸出: {}",
            video_path.display()
        );
        include_audio = false;
    }

    let intervals = sample_intervals(
        video_info.duration_seconds,
        config.clip_count,
        config.clip_duration,
        config.mode,
    )?;
    let subclips: Vec<SubClip> = intervals
        .iter()
        .enumerate()
        .map(|(i, interval)| plan_subclip(interval, i, config.clip_duration))
        .collect();

    let temp_dir = make_temp_dir(output_path)?;

    let result = assemble_and_compose(
        video_path,
        output_path,
        &subclips,
        config.resolution,
        profile,
        config.clip_duration,
        include_audio,
        &temp_dir,
    );

    // 無論成敗都清理暫存資料夾
    if temp_dir.exists() && fs::remove_dir_all(&temp_dir).is_err() {
        warn!("無法清理暫存資料夾: {}", temp_dir.display());
    }

    result?;

    Ok(PreviewReport {
        output_path: output_path.to_path_buf(),
        clip_count: subclips.len(),
        expected_duration: total_duration(
            subclips.len(),
            config.clip_duration,
            profile.overlap(),
        ),
    })
}

/// 暫存資料夾：輸出檔旁的 `.tmp_{stem}`
///
/// 以輸出檔名為準，同一來源可同時產生不同輸出而不互相干擾
fn make_temp_dir(output_path: &Path) -> Result<PathBuf, PreviewError> {
    let stem = output_path
        .file_stem()
        .map_or_else(|| "preview".to_string(), |s| s.to_string_lossy().to_string());
    let temp_dir = output_path
        .parent()
        .unwrap_or(Path::new("."))
        .join(format!(".tmp_{stem}"));
    ensure_directory_exists(&temp_dir)?;
    Ok(temp_dir)
}

#[allow(clippy::too_many_arguments)]
fn assemble_and_compose(
    video_path: &Path,
    output_path: &Path,
    subclips: &[SubClip],
    resolution: Resolution,
    profile: &TransitionProfile,
    clip_duration: f64,
    include_audio: bool,
    temp_dir: &Path,
) -> Result<(), PreviewError> {
    let progress = ProgressBar::new(subclips.len() as u64);

    let mut segment_paths = Vec::with_capacity(subclips.len());
    for subclip in subclips {
        let path = segment_path(temp_dir, subclip);
        extract_segment(video_path, subclip, resolution, include_audio, &path)?;
        segment_paths.push(path);
        progress.inc(1);
    }
    progress.finish_and_clear();

    concatenate(
        &segment_paths,
        subclips,
        profile,
        clip_duration,
        include_audio,
        output_path,
    )
}

/// 互動式預覽產生器
pub struct PreviewGenerator {
    config: Config,
}

impl PreviewGenerator {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&mut self) -> Result<()> {
        println!("{}", style("=== 建立影片預覽 ===").cyan().bold());

        let video_path = self.prompt_video_path()?;
        validate_file_exists(&video_path)?;

        let video_info = get_video_info(&video_path)?;
        print_video_attributes(&video_info);

        let output_path = self.prompt_output_path(&video_path)?;
        let preview_config = self.prompt_preview_config()?;
        let profile = TransitionProfile::default();

        self.remember_run(&video_path, &preview_config);

        println!();
        println!("{}", style("開始產生預覽...").cyan());

        let report = create_video_preview(&video_path, &output_path, &preview_config, &profile)?;

        println!(
            "{} 預覽影片已儲存到 {}（{} 段，約 {:.1} 秒）",
            style("✓").green(),
            style(report.output_path.display()).bold(),
            report.clip_count,
            report.expected_duration
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

    fn prompt_output_path(&self, video_path: &Path) -> Result<PathBuf> {
        let default = default_preview_path(video_path);
        let path: String = Input::new()
            .with_prompt("請輸入輸出檔案路徑")
            .default(default.to_string_lossy().to_string())
            .interact_text()?;
        Ok(PathBuf::from(path.trim()))
    }

    fn prompt_preview_config(&self) -> Result<PreviewConfig> {
        let settings = &self.config.settings;

        let clip_duration: f64 = Input::new()
            .with_prompt("每段片段長度（秒）")
            .default(settings.clip_duration)
            .interact_text()?;

        let clip_count: usize = Input::new()
            .with_prompt("片段數量")
            .default(settings.num_clips)
            .interact_text()?;

        let resolution_text: String = Input::new()
            .with_prompt("輸出解析度（WIDTHxHEIGHT）")
            .default(settings.resolution.clone())
            .interact_text()?;
        let resolution: Resolution = match resolution_text.trim().parse() {
            Ok(resolution) => resolution,
            Err(e) => {
                println!(
                    "{} {e}，改用預設 {}",
                    style("!").yellow(),
                    settings.resolution
                );
                settings.resolution.parse()?
            }
        };

        let include_audio = Confirm::new()
            .with_prompt("是否包含音訊？")
            .default(settings.include_audio)
            .interact()?;

        let random_selection = Confirm::new()
            .with_prompt("是否隨機選取片段？（否則等距取樣）")
            .default(settings.random_selection)
            .interact()?;

        let mode = if random_selection {
            crate::config::SamplingMode::Random
        } else {
            crate::config::SamplingMode::Even
        };

        Ok(PreviewConfig {
            resolution,
            clip_duration,
            clip_count,
            include_audio,
            mode,
        })
    }

    /// 把這次的選擇寫回偏好，下次當預設值
    fn remember_run(&mut self, video_path: &Path, preview_config: &PreviewConfig) {
        let settings = &mut self.config.settings;
        settings.clip_duration = preview_config.clip_duration;
        settings.num_clips = preview_config.clip_count;
        settings.resolution = preview_config.resolution.to_string();
        settings.include_audio = preview_config.include_audio;
        settings.random_selection = preview_config.mode == crate::config::SamplingMode::Random;
        add_recent_path(settings, &video_path.to_string_lossy());

        if let Err(e) = save_settings(settings) {
            warn!("無法儲存偏好設定: {e}");
        } else {
            info!("偏好設定已更新");
        }
    }
}

/// 顯示來源影片屬性
fn print_video_attributes(video_info: &crate::tools::VideoInfo) {
    println!(
        "  {} {:.1}s, {}x{}, {:.2} fps, {}",
        style("來源:").blue(),
        video_info.duration_seconds,
        video_info.width,
        video_info.height,
        video_info.frame_rate,
        video_info.video_codec
    );
    match &video_info.audio_codec {
        Some(codec) => println!("  {} {codec}", style("音訊:").blue()),
        None => println!("  {} 無", style("音訊:").blue()),
    }
}
