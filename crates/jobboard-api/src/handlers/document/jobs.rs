//! Job postings.

use axum::extract::State;
use axum::Json;
use jobboard_docstore::Stored;
use jobboard_models::JobPosting;
use tracing::info;

use crate::auth::AdminPrincipal;
use crate::error::ApiResult;
use crate::extract::{PathParam, ValidatedJson};
use crate::state::DocumentState;

/// Serves both `POST /admin/jobs` and `POST /api/jobs`.
pub async fn create_job(
    State(state): State<DocumentState>,
    AdminPrincipal(admin): AdminPrincipal,
    ValidatedJson(posting): ValidatedJson<JobPosting>,
) -> ApiResult<Json<Stored<JobPosting>>> {
    let job = state.jobs.create(posting)?;
    info!(job_id = %job.id, admin = %admin.email, "Job posted");
    Ok(Json(job))
}

/// Open postings only.
pub async fn list_jobs(State(state): State<DocumentState>) -> ApiResult<Json<Vec<Stored<JobPosting>>>> {
    Ok(Json(state.jobs.list_open()?))
}

pub async fn get_job(
    State(state): State<DocumentState>,
    PathParam(id): PathParam<String>,
) -> ApiResult<Json<Stored<JobPosting>>> {
    Ok(Json(state.jobs.get(&id)?))
}
