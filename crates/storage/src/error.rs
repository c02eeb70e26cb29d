//! Storage error types

use std::path::PathBuf;
use thiserror::Error;
use tilawah_core::AppError;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read store at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write store at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    /// A stored value no longer matches the expected shape
    #[error("Stored value for key '{key}' is unreadable: {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::storage("Local storage failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilawah_core::RecoveryAction;

    #[test]
    fn test_converts_to_app_error() {
        let err: AppError = StorageError::LockPoisoned.into();
        assert!(matches!(err, AppError::StorageError { .. }));
        assert_eq!(err.recovery_action(), RecoveryAction::DisableFeature);
    }
}
