//! Admin and user registration and login.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use jobboard_auth::{AccessToken, Partition};
use jobboard_docstore::Stored;
use jobboard_models::ApplicationRecord;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::auth::UserPrincipal;
use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::handlers::MessageResponse;
use crate::metrics;
use crate::state::DocumentState;

/// Email/password body shared by admin registration and both logins.
#[derive(Debug, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserRegistration {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

pub async fn register_admin(
    State(state): State<DocumentState>,
    ValidatedJson(body): ValidatedJson<Credentials>,
) -> ApiResult<Json<MessageResponse>> {
    let hash = state.gate.hasher().hash(&body.password).await?;
    state.admins.create(&body.email, &hash)?;
    info!(email = %body.email, "Admin registered");
    Ok(Json(MessageResponse::new("Admin registered successfully")))
}

pub async fn admin_login(
    State(state): State<DocumentState>,
    ValidatedJson(body): ValidatedJson<Credentials>,
) -> ApiResult<Json<AccessToken>> {
    login(&state, Partition::Admin, body).await
}

async fn create_user(state: &DocumentState, body: UserRegistration) -> ApiResult<()> {
    let hash = state.gate.hasher().hash(&body.password).await?;
    state.users.create(&body.name, &body.email, &hash)?;
    info!(email = %body.email, "User registered");
    Ok(())
}

/// `POST /api/auth/register`
pub async fn register_user(
    State(state): State<DocumentState>,
    ValidatedJson(body): ValidatedJson<UserRegistration>,
) -> ApiResult<Json<MessageResponse>> {
    create_user(&state, body).await?;
    Ok(Json(MessageResponse::new("User registered successfully")))
}

/// `POST /api/users`: same as registration but answers 201.
pub async fn signup(
    State(state): State<DocumentState>,
    ValidatedJson(body): ValidatedJson<UserRegistration>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    create_user(&state, body).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("User created successfully"))))
}

pub async fn user_login(
    State(state): State<DocumentState>,
    ValidatedJson(body): ValidatedJson<Credentials>,
) -> ApiResult<Json<AccessToken>> {
    login(&state, Partition::User, body).await
}

async fn login(state: &DocumentState, partition: Partition, body: Credentials) -> ApiResult<Json<AccessToken>> {
    let label = match partition {
        Partition::Admin => "admin",
        Partition::User => "user",
    };
    let result = state.gate.login(partition, &body.email, &body.password).await;
    metrics::record_login(label, result.is_ok());
    Ok(Json(result?))
}

/// Applications submitted by the calling user.
pub async fn own_applications(
    State(state): State<DocumentState>,
    UserPrincipal(user): UserPrincipal,
) -> ApiResult<Json<Vec<Stored<ApplicationRecord>>>> {
    Ok(Json(state.applications.list_submitted_by(&user.email)?))
}
