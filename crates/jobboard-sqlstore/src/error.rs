//! Relational store error types.

use thiserror::Error;

/// Result type for relational store operations.
pub type SqlStoreResult<T> = Result<T, SqlStoreError>;

/// Errors that can occur during relational store operations.
#[derive(Debug, Error)]
pub enum SqlStoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Malformed row: {0}")]
    Malformed(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl SqlStoreError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SqlStoreError::NotFound(_))
    }

    /// True if a UNIQUE constraint rejected the write.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            SqlStoreError::Database(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

impl From<jobboard_models::ParseEnumError> for SqlStoreError {
    fn from(err: jobboard_models::ParseEnumError) -> Self {
        Self::Malformed(err.to_string())
    }
}
