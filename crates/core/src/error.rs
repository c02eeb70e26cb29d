//! Error types and recovery strategies for Tilawah
//!
//! Errors are classified into three severity tiers:
//! - **Recoverable**: can be retried or worked around (a verse provider is down)
//! - **Degraded**: a feature is disabled but the app continues (storage unavailable)
//! - **Fatal**: requires user intervention (invalid identifiers passed by a caller)
//!
//! Each error carries a recovery action to guide automatic handling.

use std::fmt;
use std::io;
use thiserror::Error;

/// Recovery actions that can be taken when an error occurs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Try the next provider in the chain
    TryFallback,
    /// Continue without persisting state
    DisableFeature,
    /// Reset the affected settings to their defaults
    ResetToDefaults,
    /// No automatic recovery - user intervention required
    UserIntervention,
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TryFallback => write!(f, "Trying fallback provider"),
            Self::DisableFeature => write!(f, "Disabling feature"),
            Self::ResetToDefaults => write!(f, "Resetting to defaults"),
            Self::UserIntervention => write!(f, "User intervention required"),
        }
    }
}

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Error can be automatically recovered from
    Recoverable,
    /// Feature degraded but app can continue
    Degraded,
    /// Critical error requiring user action
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Recoverable"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Main error type for Tilawah
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Identity Errors =====
    /// Chapter number outside 1..=114
    #[error("Invalid chapter: {0}")]
    InvalidChapter(u16),

    /// Juz number outside 1..=30
    #[error("Invalid juz: {0}")]
    InvalidJuz(u8),

    /// Verse number outside its chapter
    #[error("Invalid verse {local} in chapter {chapter}")]
    InvalidVerse { chapter: u16, local: u16 },

    /// Global verse index outside the corpus
    #[error("Invalid global verse index: {0}")]
    InvalidGlobalIndex(u32),

    /// Verses are not in strictly increasing global order
    #[error("Invalid verse sequence: {reason}")]
    InvalidSequence { reason: String },

    // ===== Provider Errors =====
    /// A verse provider could not produce a sequence
    #[error("Verse provider '{provider}' failed: {reason}")]
    ProviderFailed { provider: String, reason: String },

    /// Every provider in the chain failed or returned nothing
    #[error("No verses available for {selection}")]
    NoVersesAvailable { selection: String },

    // ===== Storage Errors =====
    /// Persisted state could not be read or written
    #[error("Storage error: {message}")]
    StorageError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// General I/O error
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },

    // ===== Configuration Errors =====
    /// Invalid configuration
    #[error("Invalid configuration: {setting} = '{value}' ({reason})")]
    InvalidConfiguration {
        setting: String,
        value: String,
        reason: String,
    },

    // ===== Generic Errors =====
    /// Generic internal error
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl AppError {
    /// Returns the severity classification of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ProviderFailed { .. } | Self::NoVersesAvailable { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::StorageError { .. }
            | Self::IoError { .. }
            | Self::InvalidConfiguration { .. } => ErrorSeverity::Degraded,
            Self::InvalidChapter(_)
            | Self::InvalidJuz(_)
            | Self::InvalidVerse { .. }
            | Self::InvalidGlobalIndex(_)
            | Self::InvalidSequence { .. }
            | Self::InternalError { .. } => ErrorSeverity::Fatal,
        }
    }

    /// Returns the recommended recovery action
    pub fn recovery_action(&self) -> RecoveryAction {
        match self {
            Self::ProviderFailed { .. } => RecoveryAction::TryFallback,
            Self::StorageError { .. } | Self::IoError { .. } => RecoveryAction::DisableFeature,
            Self::InvalidConfiguration { .. } => RecoveryAction::ResetToDefaults,
            _ => RecoveryAction::UserIntervention,
        }
    }

    /// Returns a user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidChapter(n) => format!("There is no chapter {}.", n),
            Self::InvalidJuz(n) => format!("There is no juz {}.", n),
            Self::InvalidVerse { chapter, local } => {
                format!("Chapter {} has no verse {}.", chapter, local)
            }
            Self::InvalidGlobalIndex(_) | Self::InvalidSequence { .. } => {
                "The requested verses could not be arranged for playback.".to_string()
            }
            Self::ProviderFailed { .. } | Self::NoVersesAvailable { .. } => {
                "Verses could not be loaded. Please check your connection.".to_string()
            }
            Self::StorageError { .. } | Self::IoError { .. } => {
                "Your reading position could not be saved.".to_string()
            }
            Self::InvalidConfiguration { setting, .. } => {
                format!("Invalid setting: {}. Please check your configuration.", setting)
            }
            Self::InternalError { .. } => {
                "An unexpected error occurred. Please try again.".to_string()
            }
        }
    }

    /// Returns true if this error should be logged at ERROR level
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Fatal
    }

    /// Helper to create a storage error from any error type
    pub fn storage<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::StorageError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Helper to create a provider failure
    pub fn provider(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ProviderFailed {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        Self::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}
