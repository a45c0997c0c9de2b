//! Error Handling
//!
//! Unified error types for the storage layer.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Storage-layer error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Store-level errors (corrupt files, unreadable directories)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Image decode/encode errors
    #[error("Image error: {0}")]
    Image(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for storage-layer errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an image error
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert AppError to a plain string for callers that surface raw messages
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
