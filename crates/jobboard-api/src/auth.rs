//! Bearer-token extractors.
//!
//! Each extractor pulls the token from `Authorization: Bearer <token>` and
//! asks the [`AccessGate`] to resolve it. Any state that can hand out an
//! `AccessGate` via `FromRef` can use them.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jobboard_auth::{AccessGate, AuthError};
use jobboard_models::Principal;

use crate::error::ApiError;

/// Extract the raw bearer token from request headers.
pub fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Auth(AuthError::Unauthorized))?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or(ApiError::Auth(AuthError::Unauthorized))?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(ApiError::Auth(AuthError::Unauthorized));
    }
    Ok(token.trim())
}

/// An administrator. Regular users get 403, anonymous callers 401.
#[derive(Debug, Clone)]
pub struct AdminPrincipal(pub Principal);

/// A principal from the user partition.
#[derive(Debug, Clone)]
pub struct UserPrincipal(pub Principal);

/// Any resolved principal, admin or user.
#[derive(Debug, Clone)]
pub struct AnyPrincipal(pub Principal);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminPrincipal
where
    AccessGate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let gate = AccessGate::from_ref(state);
        Ok(Self(gate.authenticate_admin(token).await?))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for UserPrincipal
where
    AccessGate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let gate = AccessGate::from_ref(state);
        Ok(Self(gate.authenticate_user(token).await?))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AnyPrincipal
where
    AccessGate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let gate = AccessGate::from_ref(state);
        Ok(Self(gate.authenticate_any(token).await?))
    }
}
