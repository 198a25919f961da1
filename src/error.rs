//! Error types for the wantslist checker

use thiserror::Error;

/// Unified error type for API and file operations
#[derive(Debug, Error)]
pub enum CheckerError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to parse a JSON response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// API returned a structured error response
    #[error("{code}: {details}")]
    ApiResponse { code: String, details: String },

    /// HTTP error status without a readable error body
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for checker operations
pub type Result<T> = std::result::Result<T, CheckerError>;
