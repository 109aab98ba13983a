//! Core error types for pomocue-core.
//!
//! Validation failures surface synchronously at session start, playback
//! failures are reported but never end a run, and state errors reject a
//! command without touching the session.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::{ControllerState, SessionHandle};

/// Core error type for pomocue-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session configuration rejected at start
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Command issued against a session that cannot accept it
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Audio engine refused to play
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Config directory could not be determined or created
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// Session configuration rejected by `SessionConfig::validate`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("reminder interval must be at least 1 minute (got {0})")]
    CueIntervalTooShort(u32),

    #[error("focus duration must be at least 10 minutes or 0 for indefinite (got {0})")]
    FocusTooShort(u32),

    #[error("number of focus periods must be at least 1")]
    NoFocusPeriods,

    #[error("break duration must be at least 1 minute (got {0})")]
    BreakTooShort(u32),

    #[error("uploaded audio source needs at least one cue file")]
    NoUploadedCues,

    #[error("uploaded audio source holds {count} cue files, limit is {max}")]
    TooManyCues { count: usize, max: usize },

    #[error("duplicate cue file name: {0}")]
    DuplicateCue(String),
}

/// The audio engine refused to play a clip.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not play '{clip}': {message}")]
pub struct PlaybackError {
    pub clip: String,
    pub message: String,
}

impl PlaybackError {
    pub fn new(clip: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            clip: clip.into(),
            message: message.into(),
        }
    }
}

/// A command that the addressed session cannot accept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("no session with handle {0}")]
    UnknownSession(SessionHandle),

    #[error("cannot {command} a session that is {state:?}")]
    InvalidCommand {
        command: &'static str,
        state: ControllerState,
    },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn unknown_key(key: &str) -> Result<()> {
        Err(ConfigError::UnknownKey(key.to_string()))?
    }

    #[test]
    fn config_errors_convert_into_core_error() {
        let err = unknown_key("session.nope").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown configuration key: session.nope"
        );
    }

    #[test]
    fn validation_errors_keep_their_message() {
        let err = CoreError::from(ValidationError::FocusTooShort(5));
        assert!(err.to_string().starts_with("Validation error: focus duration"));
    }
}
