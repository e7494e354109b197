//! Applications: submission with resume upload, listing, review.

use axum::extract::{Multipart, State};
use axum::response::Response;
use axum::Json;
use jobboard_auth::{AccessGate, Owner};
use jobboard_models::{
    Application, ApplicationStatusUpdate, ApplicationWithJob, NewApplication, Principal,
};
use jobboard_storage::ResumeStore;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use super::user_id;
use crate::auth::{AdminPrincipal, UserPrincipal};
use crate::error::{ApiError, ApiResult};
use crate::extract::{PathParam, ValidatedJson, ValidatedQuery};
use crate::handlers::resume::{download_name, resume_response, save_then_insert, Disposition};
use crate::state::RelationalState;
use crate::upload::MultipartForm;

const RESUME_FIELD: &str = "resume";

fn default_limit() -> i64 {
    100
}

#[derive(Debug, Deserialize, Validate)]
pub struct Pagination {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 0, max = 1000))]
    pub limit: i64,
}

/// Own applications; admins see everyone's.
pub async fn list_applications(
    State(state): State<RelationalState>,
    UserPrincipal(principal): UserPrincipal,
    ValidatedQuery(page): ValidatedQuery<Pagination>,
) -> ApiResult<Json<Vec<ApplicationWithJob>>> {
    let owner = if principal.is_admin() {
        None
    } else {
        Some(user_id(&principal)?)
    };
    let applications = state
        .applications
        .list_with_jobs(page.skip, page.limit, owner)
        .await?;
    Ok(Json(applications))
}

pub async fn applications_for_job(
    State(state): State<RelationalState>,
    _admin: AdminPrincipal,
    PathParam(job_id): PathParam<i64>,
) -> ApiResult<Json<Vec<Application>>> {
    Ok(Json(state.applications.list_by_job(job_id).await?))
}

async fn owned_application(
    state: &RelationalState,
    principal: &Principal,
    id: i64,
) -> ApiResult<ApplicationWithJob> {
    let found = state.applications.get_with_job(id).await?;
    AccessGate::require_owner_or_admin(principal, Owner::Id(&found.application.user_id.to_string()))?;
    Ok(found)
}

pub async fn get_application(
    State(state): State<RelationalState>,
    UserPrincipal(principal): UserPrincipal,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Json<ApplicationWithJob>> {
    Ok(Json(owned_application(&state, &principal, id).await?))
}

async fn serve_resume(
    state: &RelationalState,
    principal: &Principal,
    id: i64,
    disposition: Disposition,
) -> ApiResult<Response> {
    let found = owned_application(state, principal, id).await?;
    if found.application.resume_url.is_empty() {
        return Err(ApiError::not_found("Resume not found"));
    }

    let file = state.resumes.open(&found.application.resume_url).await?;
    let name = download_name(&found.application.name, &found.job.title, &file.file_name);
    Ok(resume_response(file, &name, disposition))
}

pub async fn download_resume(
    State(state): State<RelationalState>,
    UserPrincipal(principal): UserPrincipal,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Response> {
    serve_resume(&state, &principal, id, Disposition::Attachment).await
}

pub async fn view_resume(
    State(state): State<RelationalState>,
    UserPrincipal(principal): UserPrincipal,
    PathParam(id): PathParam<i64>,
) -> ApiResult<Response> {
    serve_resume(&state, &principal, id, Disposition::Inline).await
}

fn new_application(form: &MultipartForm) -> ApiResult<NewApplication> {
    let job_id = form
        .require("job_id")?
        .parse()
        .map_err(|_| ApiError::validation("job_id: value is not a valid integer"))?;
    let application = NewApplication {
        job_id,
        name: form.require("name")?,
        email: form.require("email")?,
        cover_letter: form.text("cover_letter").map(str::to_string),
    };
    application
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    Ok(application)
}

/// `POST /applications`
///
/// Nothing is written unless the resume type, the form, the job and the
/// duplicate policy all check out. A failed insert deletes the saved resume.
pub async fn submit_application(
    State(state): State<RelationalState>,
    UserPrincipal(principal): UserPrincipal,
    multipart: Multipart,
) -> ApiResult<Json<Application>> {
    let mut form = MultipartForm::read(multipart).await?;
    let file = form.take_file(RESUME_FIELD)?;
    ResumeStore::check(&file.file_name)?;

    let application = new_application(&form)?;
    let uid = user_id(&principal)?;
    state.applications.ensure_can_apply(uid, application.job_id).await?;

    let job_id = application.job_id.to_string();
    let created = save_then_insert(
        &state.resumes,
        &principal.id,
        &job_id,
        &file,
        |url| async move { state.applications.create(uid, &application, &url).await },
    )
    .await?;
    info!(application_id = created.id, user_id = uid, "Application submitted");
    Ok(Json(created))
}

pub async fn update_status(
    State(state): State<RelationalState>,
    _admin: AdminPrincipal,
    PathParam(id): PathParam<i64>,
    ValidatedJson(update): ValidatedJson<ApplicationStatusUpdate>,
) -> ApiResult<Json<Application>> {
    Ok(Json(state.applications.update_status(id, update.status).await?))
}
