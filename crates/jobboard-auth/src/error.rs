//! Authentication error types.

use thiserror::Error;

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Errors raised by the authentication core.
///
/// `Unauthorized` covers every way a caller can fail to prove who they are,
/// so unknown emails, wrong passwords and bad tokens look the same from outside.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Not enough permissions")]
    Forbidden,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token encoding failed: {0}")]
    Encoding(String),

    #[error("Invalid auth configuration: {0}")]
    Config(String),

    #[error("Credential store error: {0}")]
    Store(String),
}

impl AuthError {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for failures the caller caused (401/403), false for server faults.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::Unauthorized | AuthError::Forbidden | AuthError::InvalidToken
        )
    }
}
