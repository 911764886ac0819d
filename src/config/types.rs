use crate::error::PreviewError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const MAX_RECENT_PATHS: usize = 10;

/// 取樣模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingMode {
    /// 等距取樣：起點固定為 i * duration / count
    Even,
    /// 隨機取樣：均勻抽選後依時間排序
    Random,
}

impl fmt::Display for SamplingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Even => write!(f, "等距"),
            Self::Random => write!(f, "隨機"),
        }
    }
}

/// 輸出解析度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn validate(&self) -> Result<(), PreviewError> {
        if self.width == 0 || self.height == 0 {
            return Err(PreviewError::InvalidConfiguration(format!(
                "解析度必須大於 0: {self}"
            )));
        }
        Ok(())
    }
}

impl FromStr for Resolution {
    type Err = PreviewError;

    /// 解析 "WIDTHxHEIGHT" 格式字串
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s.split_once(['x', 'X']).ok_or_else(|| {
            PreviewError::InvalidConfiguration(format!("解析度格式錯誤（應為 WIDTHxHEIGHT）: {s}"))
        })?;
        let width = w.trim().parse().map_err(|_| {
            PreviewError::InvalidConfiguration(format!("解析度寬度無效: {w}"))
        })?;
        let height = h.trim().parse().map_err(|_| {
            PreviewError::InvalidConfiguration(format!("解析度高度無效: {h}"))
        })?;

        let resolution = Self { width, height };
        resolution.validate()?;
        Ok(resolution)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// 轉場設定：套用在每個子片段邊界的淡入淡出長度（秒）
#[derive(Debug, Clone, Copy)]
pub struct TransitionProfile {
    pub fade_in_duration: f64,
    pub fade_out_duration: f64,
}

impl Default for TransitionProfile {
    fn default() -> Self {
        Self {
            fade_in_duration: 0.0,
            fade_out_duration: 0.5,
        }
    }
}

impl TransitionProfile {
    /// 相鄰片段在合成時間軸上的重疊量
    ///
    /// 淡入為 0 時不重疊，總長固定為 count * clip_duration；
    /// 淡入大於 0 時，前段淡出與後段淡入在重疊窗內交疊。
    #[must_use]
    pub fn overlap(&self) -> f64 {
        self.fade_in_duration.min(self.fade_out_duration).max(0.0)
    }
}

/// 預覽產生設定（單次執行期間不可變）
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub resolution: Resolution,
    pub clip_duration: f64,
    pub clip_count: usize,
    pub include_audio: bool,
    pub mode: SamplingMode,
}

impl PreviewConfig {
    pub fn validate(&self) -> Result<(), PreviewError> {
        if self.clip_duration <= 0.0 {
            return Err(PreviewError::InvalidConfiguration(format!(
                "片段長度必須大於 0（目前為 {}）",
                self.clip_duration
            )));
        }
        if self.clip_count == 0 {
            return Err(PreviewError::InvalidConfiguration(
                "片段數量至少為 1".to_string(),
            ));
        }
        self.resolution.validate()
    }
}

/// 影格擷取設定
#[derive(Debug, Clone)]
pub struct FrameSampleConfig {
    pub num_frames: usize,
    pub output_dir: PathBuf,
}

impl FrameSampleConfig {
    pub fn validate(&self) -> Result<(), PreviewError> {
        if self.num_frames == 0 {
            return Err(PreviewError::InvalidConfiguration(
                "影格數量至少為 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// 使用者偏好（settings.json）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub clip_duration: f64,
    pub num_clips: usize,
    pub resolution: String,
    pub include_audio: bool,
    pub random_selection: bool,
    pub num_frames: usize,
    pub recent_paths: Vec<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            clip_duration: 2.0,
            num_clips: 5,
            resolution: "1280x720".to_string(),
            include_audio: true,
            random_selection: false,
            num_frames: 10,
            recent_paths: Vec::new(),
        }
    }
}

impl UserSettings {
    /// 由偏好組出取樣模式
    #[must_use]
    pub const fn sampling_mode(&self) -> SamplingMode {
        if self.random_selection {
            SamplingMode::Random
        } else {
            SamplingMode::Even
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: UserSettings,
}
