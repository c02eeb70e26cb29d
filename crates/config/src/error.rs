//! Error types for the configuration system

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write config file at {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Config contains invalid values
    #[error("Config validation failed: {0}")]
    ValidationError(String),

    /// An older config file could not be upgraded
    #[error("Failed to migrate config from version {from}: {reason}")]
    MigrationError { from: u32, reason: String },

    #[error("Failed to create config directory at {path}: {source}")]
    DirectoryCreationError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not determine config directory path: {reason}")]
    PathResolutionError { reason: String },

    /// Failed to keep a copy of the previous config
    #[error("Failed to backup config file: {source}")]
    BackupError { source: std::io::Error },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Validation error for a specific config field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path to the field (e.g., "audio.playback_rate")
    pub field: String,

    /// Human-readable error message
    pub message: String,

    /// The invalid value, if available
    pub value: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    /// Creates a validation error carrying the rejected value
    pub fn with_value(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: Some(value.to_string()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Field '{}': {}", self.field, self.message)?;
        if let Some(ref value) = self.value {
            write!(f, " (got: {})", value)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Joins validation errors into one message for logs and `ConfigError`
pub(crate) fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("audio.prefetch_depth", "must be between 0 and 10");
        assert_eq!(
            err.to_string(),
            "Field 'audio.prefetch_depth': must be between 0 and 10"
        );
    }

    #[test]
    fn test_validation_error_with_value() {
        let err = ValidationError::with_value("audio.playback_rate", "must be between 0.5 and 2", 4);
        assert_eq!(
            err.to_string(),
            "Field 'audio.playback_rate': must be between 0.5 and 2 (got: 4)"
        );
    }

    #[test]
    fn test_join_errors() {
        let errors = vec![
            ValidationError::new("a", "bad"),
            ValidationError::new("b", "worse"),
        ];
        assert_eq!(join_errors(&errors), "Field 'a': bad; Field 'b': worse");
    }
}
