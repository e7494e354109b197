//! API error types.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use jobboard_auth::AuthError;
use jobboard_docstore::DocStoreError;
use jobboard_sqlstore::SqlStoreError;
use jobboard_storage::StorageError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Document store error: {0}")]
    DocStore(#[from] DocStoreError),

    #[error("Relational store error: {0}")]
    SqlStore(#[from] SqlStoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized("Invalid credentials".to_string())
    }

    pub fn forbidden() -> Self {
        Self::Forbidden("Not enough permissions".to_string())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,

            ApiError::Auth(e) => match e {
                AuthError::Unauthorized | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::Forbidden => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::DocStore(e) => match e {
                DocStoreError::NotFound(_) => StatusCode::NOT_FOUND,
                DocStoreError::Conflict(_) => StatusCode::BAD_REQUEST,
                DocStoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::SqlStore(e) => match e {
                SqlStoreError::NotFound(_) => StatusCode::NOT_FOUND,
                SqlStoreError::Conflict(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Storage(e) => match e {
                StorageError::UnsupportedType | StorageError::InvalidName(_) => StatusCode::BAD_REQUEST,
                StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                StorageError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::Validation(_) | ApiError::DocStore(DocStoreError::Validation(_)) => {
                Some("validation_error")
            }
            ApiError::RateLimited => Some("rate_limited"),
            _ => None,
        }
    }

    /// Message shown to the client: the bare message for client errors.
    fn detail(&self) -> String {
        match self {
            ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::BadRequest(m)
            | ApiError::Conflict(m)
            | ApiError::Validation(m) => m.clone(),
            ApiError::RateLimited => "Rate limit exceeded. Please try again later.".to_string(),
            ApiError::Auth(AuthError::Unauthorized | AuthError::InvalidToken) => {
                "Invalid credentials".to_string()
            }
            ApiError::Auth(AuthError::Forbidden) => "Not enough permissions".to_string(),
            ApiError::DocStore(DocStoreError::Validation(m)) => m.clone(),
            other if other.status_code().is_client_error() => match other {
                ApiError::DocStore(e) => e.to_string(),
                ApiError::SqlStore(e) => e.to_string(),
                ApiError::Storage(e) => e.to_string(),
                _ => other.to_string(),
            },
            other => other.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = if status.is_server_error() {
            error!(error = %self, "Request failed");
            if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                "An internal error occurred".to_string()
            } else {
                self.detail()
            }
        } else {
            self.detail()
        };

        let body = ErrorResponse {
            detail,
            code: self.code(),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
