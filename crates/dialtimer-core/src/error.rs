//! Core error types for dialtimer-core.
//!
//! Gestures and ticks cannot fail, so the hierarchy only covers the
//! configuration file, value validation and loading the alarm clip.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for dialtimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Alarm clip errors
    #[error("Alarm error: {0}")]
    Alarm(#[from] AlarmError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
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

    /// Could not determine where the configuration lives
    #[error("Could not resolve the configuration directory: {0}")]
    NoDataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Value outside the unit's dial range
    #[error("{unit} must be between 0 and {max}, got {value}")]
    OutOfRange {
        unit: &'static str,
        value: u32,
        max: u32,
    },
}

/// Errors raised while loading the alarm clip.
#[derive(Error, Debug)]
pub enum AlarmError {
    /// The output device is not available
    #[error("Alarm output unavailable: {0}")]
    Unavailable(String),

    /// Writing to the output failed
    #[error("Alarm output failed: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::DialDuration;

    fn check_minute(value: u32) -> Result<u32> {
        Ok(DialDuration::new(0, value, 0)?.minute)
    }

    #[test]
    fn question_mark_lifts_into_core_error() {
        assert_eq!(check_minute(5).unwrap(), 5);
        let err = check_minute(60).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation error: minute must be between 0 and 59, got 60"
        );

        let err: CoreError = ConfigError::UnknownKey("alarm.nope".into()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown configuration key: alarm.nope"
        );
    }
}
