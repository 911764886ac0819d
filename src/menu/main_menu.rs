use crate::config::Config;
use crate::config::save::save_settings;
use crate::menu::handlers::{run_frame_sampler, run_preview_generator};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

pub fn show_main_menu(term: &Term, config: &mut Config) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style("=== 影片預覽產生器 ===").cyan().bold());
    println!("{}", style("（按 ESC 離開）").dim());

    let options = vec!["建立影片預覽", "擷取影格", "設定", "離開"];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇功能")
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_preview_generator(term)?;
            Ok(true)
        }
        Some(1) => {
            run_frame_sampler(term)?;
            Ok(true)
        }
        Some(2) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(3) | None => Ok(false), // ESC pressed - exit
        _ => unreachable!(),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style("=== 設定 ===").cyan().bold());
        println!("{}", style("（按 ESC 返回）").dim());

        let settings = &config.settings;
        let options = vec![
            format!("片段長度: {} 秒", settings.clip_duration),
            format!("片段數量: {}", settings.num_clips),
            format!("輸出解析度: {}", settings.resolution),
            format!(
                "包含音訊: {}",
                if settings.include_audio { "是" } else { "否" }
            ),
            format!(
                "隨機選取: {}",
                if settings.random_selection {
                    "是"
                } else {
                    "否"
                }
            ),
            format!("影格擷取數量: {}", settings.num_frames),
            "返回".to_string(),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("請選擇要修改的項目")
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        match selection {
            Some(0) => {
                config.settings.clip_duration = Input::new()
                    .with_prompt("片段長度（秒）")
                    .default(config.settings.clip_duration)
                    .interact_text()?;
            }
            Some(1) => {
                config.settings.num_clips = Input::new()
                    .with_prompt("片段數量")
                    .default(config.settings.num_clips)
                    .interact_text()?;
            }
            Some(2) => {
                let text: String = Input::new()
                    .with_prompt("輸出解析度（WIDTHxHEIGHT）")
                    .default(config.settings.resolution.clone())
                    .interact_text()?;
                match text.trim().parse::<crate::config::Resolution>() {
                    Ok(resolution) => config.settings.resolution = resolution.to_string(),
                    Err(e) => {
                        println!("{} {e}", style("!").yellow());
                        std::thread::sleep(std::time::Duration::from_secs(1));
                        continue;
                    }
                }
            }
            Some(3) => {
                config.settings.include_audio = Confirm::new()
                    .with_prompt("是否包含音訊？")
                    .default(config.settings.include_audio)
                    .interact()?;
            }
            Some(4) => {
                config.settings.random_selection = Confirm::new()
                    .with_prompt("是否隨機選取片段？")
                    .default(config.settings.random_selection)
                    .interact()?;
            }
            Some(5) => {
                config.settings.num_frames = Input::new()
                    .with_prompt("影格擷取數量")
                    .default(config.settings.num_frames)
                    .interact_text()?;
            }
            Some(6) | None => break, // ESC or back
            _ => unreachable!(),
        }

        save_settings(&config.settings)?;
        println!("\n{}", style("✓ 設定已儲存").green());
        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}
