//! Company profiles.

use axum::extract::State;
use axum::Json;
use jobboard_docstore::Stored;
use jobboard_models::CompanyProfile;

use crate::auth::AdminPrincipal;
use crate::error::ApiResult;
use crate::extract::{PathParam, ValidatedJson};
use crate::state::DocumentState;

pub async fn create_company(
    State(state): State<DocumentState>,
    _admin: AdminPrincipal,
    ValidatedJson(profile): ValidatedJson<CompanyProfile>,
) -> ApiResult<Json<Stored<CompanyProfile>>> {
    Ok(Json(state.companies.create(profile)?))
}

pub async fn list_companies(State(state): State<DocumentState>) -> ApiResult<Json<Vec<Stored<CompanyProfile>>>> {
    Ok(Json(state.companies.list()?))
}

pub async fn get_company(
    State(state): State<DocumentState>,
    PathParam(id): PathParam<String>,
) -> ApiResult<Json<Stored<CompanyProfile>>> {
    Ok(Json(state.companies.get(&id)?))
}
