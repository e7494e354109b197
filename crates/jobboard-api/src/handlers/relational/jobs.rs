//! Job CRUD. Reads are public, writes need an admin.

use axum::extract::State;
use axum::Json;
use jobboard_models::{Job, JobFilter, JobUpdate, NewJob};
use tracing::info;

use crate::auth::AdminPrincipal;
use crate::error::ApiResult;
use crate::extract::{PathParam, ValidatedJson, ValidatedQuery};
use crate::handlers::MessageResponse;
use crate::state::RelationalState;

pub async fn list_jobs(
    State(state): State<RelationalState>,
    ValidatedQuery(filter): ValidatedQuery<JobFilter>,
) -> ApiResult<Json<Vec<Job>>> {
    Ok(Json(state.jobs.list(&filter).await?))
}

pub async fn get_job(
    State(state): State<RelationalState>,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<Job>> {
    Ok(Json(state.jobs.get(id).await?))
}

pub async fn create_job(
    State(state): State<RelationalState>,
    AdminPrincipal(admin): AdminPrincipal,
    ValidatedJson(job): ValidatedJson<NewJob>,
) -> ApiResult<Json<Job>> {
    let job = state.jobs.create(&job).await?;
    info!(job_id = job.id, admin = %admin.email, "Job created");
    Ok(Json(job))
}

pub async fn update_job(
    State(state): State<RelationalState>,
    _admin: AdminPrincipal,
    PathParam(id): PathParam<i64>,
    ValidatedJson(update): ValidatedJson<JobUpdate>,
) -> ApiResult<Json<Job>> {
    Ok(Json(state.jobs.update(id, &update).await?))
}

pub async fn delete_job(
    State(state): State<RelationalState>,
    AdminPrincipal(admin): AdminPrincipal,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state.jobs.delete(id).await?;
    info!(job_id = id, admin = %admin.email, "Job deleted");
    Ok(Json(MessageResponse::new("Job deleted successfully")))
}
