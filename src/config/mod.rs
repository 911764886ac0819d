pub mod load;
pub mod save;
pub mod types;

pub use types::{
    Config, FrameSampleConfig, MAX_RECENT_PATHS, PreviewConfig, Resolution, SamplingMode,
    TransitionProfile, UserSettings,
};
