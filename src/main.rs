use anyhow::Result;
use clap::Parser;
use console::{Term, style};
use log::{info, warn};
use video_preview_generator::cli::{Cli, RunMode};
use video_preview_generator::component::frame_sampler::extract_frames;
use video_preview_generator::component::preview_generator::create_video_preview;
use video_preview_generator::config::{
    Config, FrameSampleConfig, PreviewConfig, SamplingMode, TransitionProfile,
};
use video_preview_generator::init;
use video_preview_generator::menu::show_main_menu;
use video_preview_generator::tools::default_preview_path;

fn main() -> Result<()> {
    init::init();
    let cli = Cli::parse();

    // 有指定影片路徑時走無互動模式
    if let Some(video_path) = cli.video_path.clone() {
        return run_headless(&cli, &video_path);
    }

    let term = Term::stdout();
    let mut config = Config::new()?;

    loop {
        match show_main_menu(&term, &mut config) {
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                println!("\n{}", style("再見！").green().bold());
                info!("程式正常結束");
                break;
            }
            Err(e) => {
                warn!("程式錯誤: {e}");
                eprintln!("{} {}", style("錯誤:").red().bold(), e);
                break;
            }
        }
    }

    Ok(())
}

fn run_headless(cli: &Cli, video_path: &std::path::Path) -> Result<()> {
    match cli.mode {
        RunMode::Preview => {
            let preview_config = PreviewConfig {
                resolution: cli.resolution.parse()?,
                clip_duration: cli.clip_duration,
                clip_count: cli.num_clips,
                include_audio: cli.include_audio,
                mode: if cli.random_selection {
                    SamplingMode::Random
                } else {
                    SamplingMode::Even
                },
            };
            let output_path = cli
                .output_file_name
                .clone()
                .unwrap_or_else(|| default_preview_path(video_path));

            let report = create_video_preview(
                video_path,
                &output_path,
                &preview_config,
                &TransitionProfile::default(),
            )?;
            println!(
                "{} 預覽影片已儲存到 {}（{} 段，約 {:.1} 秒）",
                style("✓").green(),
                report.output_path.display(),
                report.clip_count,
                report.expected_duration
            );
        }
        RunMode::Frames => {
            let sample_config = FrameSampleConfig {
                num_frames: cli.num_frames,
                output_dir: cli.output_dir.clone(),
            };
            let count = extract_frames(video_path, &sample_config)?;
            println!(
                "{} 已擷取 {} 張影格到 {}",
                style("✓").green(),
                count,
                sample_config.output_dir.display()
            );
        }
    }

    Ok(())
}
