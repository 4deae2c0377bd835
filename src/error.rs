//! Error types for configuration and asset lookups.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// Reading or writing the settings file failed
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file is not valid JSON for this layout
    #[error("config file is malformed: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    /// The settings file was written by an incompatible release
    #[error("config version {found} does not match expected {expected}")]
    ConfigVersion { found: u32, expected: u32 },

    /// A sound cue name that has no backing sample
    #[error("invalid sound '{0}'")]
    UnknownSound(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
