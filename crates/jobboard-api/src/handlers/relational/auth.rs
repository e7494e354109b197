//! Registration, login and the current user.

use axum::extract::State;
use axum::Json;
use jobboard_auth::{AccessToken, Partition};
use jobboard_sqlstore::User;
use serde::Deserialize;
use validator::Validate;

use super::user_id;
use crate::auth::UserPrincipal;
use crate::error::{ApiError, ApiResult};
use crate::extract::ValidatedJson;
use crate::metrics;
use crate::state::RelationalState;

#[derive(Debug, Deserialize, Validate)]
pub struct Registration {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 50))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct Login {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// `POST /auth/register`: returns the new user without its password digest.
pub async fn register(
    State(state): State<RelationalState>,
    ValidatedJson(body): ValidatedJson<Registration>,
) -> ApiResult<Json<User>> {
    let hash = state.gate.hasher().hash(&body.password).await?;
    let row = state.users.create(&body.email, &body.username, &hash).await?;
    Ok(Json(row.into()))
}

pub async fn login(
    State(state): State<RelationalState>,
    ValidatedJson(body): ValidatedJson<Login>,
) -> ApiResult<Json<AccessToken>> {
    let result = state
        .gate
        .login(Partition::User, &body.email, &body.password)
        .await;
    metrics::record_login("user", result.is_ok());
    Ok(Json(result?))
}

pub async fn me(
    State(state): State<RelationalState>,
    UserPrincipal(principal): UserPrincipal,
) -> ApiResult<Json<User>> {
    let row = state
        .users
        .find_by_id(user_id(&principal)?)
        .await?
        .ok_or_else(ApiError::unauthorized)?;
    Ok(Json(row.into()))
}
