//! Storage error types.

use thiserror::Error;

/// Message returned when a resume has an unsupported extension.
pub const RESUME_TYPE_ERROR: &str = "Only PDF, DOC, and DOCX files are allowed";

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{}", RESUME_TYPE_ERROR)]
    UnsupportedType,

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Resume file not found")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName(name.into())
    }
}
