//! Error types for network operations

use thiserror::Error;

/// Result type for network operations
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Errors that can occur during network operations
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Transport-level failure (DNS, connect, TLS, timeout, body)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl NetworkError {
    /// Returns true if the request timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, NetworkError::Http(e) if e.is_timeout())
    }

    /// Returns true for 4xx answers, such as a missing recitation file
    pub fn is_client_error(&self) -> bool {
        match self {
            NetworkError::Status { status, .. } => (400..500).contains(status),
            NetworkError::Http(e) => e.status().is_some_and(|s| s.is_client_error()),
            NetworkError::InvalidUrl(_) => false,
        }
    }

    /// Returns true for 5xx answers
    pub fn is_server_error(&self) -> bool {
        match self {
            NetworkError::Status { status, .. } => (500..600).contains(status),
            NetworkError::Http(e) => e.status().is_some_and(|s| s.is_server_error()),
            NetworkError::InvalidUrl(_) => false,
        }
    }
}
