use crate::component::{FrameSampler, PreviewGenerator};
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::{Term, style};

pub fn run_preview_generator(term: &Term) -> Result<()> {
    // 重新載入偏好，取得上一次執行寫回的預設值
    let config = Config::new()?;
    let mut generator = PreviewGenerator::new(config);

    if let Err(e) = generator.run() {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_frame_sampler(term: &Term) -> Result<()> {
    let config = Config::new()?;
    let mut sampler = FrameSampler::new(config);

    if let Err(e) = sampler.run() {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}
