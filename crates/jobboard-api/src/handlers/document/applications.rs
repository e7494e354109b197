//! Application submission, listing and resume access.

use axum::extract::{Multipart, State};
use axum::response::Response;
use axum::Json;
use jobboard_auth::{AccessGate, Owner};
use jobboard_docstore::{DocStoreError, Stored};
use jobboard_models::{ApplicationForm, ApplicationRecord, Principal, DUPLICATE_APPLICATION_MESSAGE};
use jobboard_storage::ResumeStore;
use tracing::info;
use validator::Validate;

use crate::auth::{AdminPrincipal, AnyPrincipal, UserPrincipal};
use crate::error::{ApiError, ApiResult};
use crate::extract::PathParam;
use crate::handlers::resume::{download_name, resume_response, save_then_insert, Disposition};
use crate::state::DocumentState;
use crate::upload::MultipartForm;

/// Multipart field carrying the resume.
const RESUME_FIELD: &str = "file";

fn application_form(form: &MultipartForm) -> ApiResult<ApplicationForm> {
    let optional = |name: &str| form.text(name).map(str::to_string);
    let application = ApplicationForm {
        job_id: form.require("jobId")?,
        job_title: form.require("jobTitle")?,
        company_name: form.require("companyName")?,
        name: form.require("name")?,
        email: form.require("email")?,
        experience: optional("experience"),
        current_ctc: optional("currentCTC"),
        expected_ctc: optional("expectedCTC"),
        notice_period: optional("noticePeriod"),
        portfolio_url: optional("portfolioURL"),
    };
    application
        .validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    Ok(application)
}

/// `POST /api/applications`
///
/// The resume type is checked before anything is written; the saved file is
/// removed again if the record cannot be stored.
pub async fn submit_application(
    State(state): State<DocumentState>,
    UserPrincipal(user): UserPrincipal,
    multipart: Multipart,
) -> ApiResult<Json<Stored<ApplicationRecord>>> {
    let mut form = MultipartForm::read(multipart).await?;
    let file = form.take_file(RESUME_FIELD)?;
    ResumeStore::check(&file.file_name)?;

    let application = application_form(&form)?;
    state.jobs.get(&application.job_id)?;

    if state.applications.policy().rejects_duplicates()
        && state.applications.has_applied(&application.job_id, &user.email)?
    {
        return Err(DocStoreError::conflict(DUPLICATE_APPLICATION_MESSAGE).into());
    }

    let job_id = application.job_id.clone();
    let submitted_by = user.email.as_str();
    let created = save_then_insert(
        &state.resumes,
        &user.id,
        &job_id,
        &file,
        |url| async move { state.applications.create(ApplicationRecord::new(application, url, submitted_by)) },
    )
    .await?;
    info!(application_id = %created.id, user = %user.email, "Application submitted");
    Ok(Json(created))
}

/// All applications. Serves `GET /api/applications` and `GET /admin/applications`.
pub async fn list_applications(
    State(state): State<DocumentState>,
    _admin: AdminPrincipal,
) -> ApiResult<Json<Vec<Stored<ApplicationRecord>>>> {
    Ok(Json(state.applications.list()?))
}

/// Applications filed under an applicant email; the owner of that email or an admin.
///
/// Keyed by the email typed into the form, not by the submitting account, so a
/// listed application's resume may still be forbidden to the caller.
pub async fn applications_by_email(
    State(state): State<DocumentState>,
    AnyPrincipal(principal): AnyPrincipal,
    PathParam(email): PathParam<String>,
) -> ApiResult<Json<Vec<Stored<ApplicationRecord>>>> {
    AccessGate::require_owner_or_admin(&principal, Owner::Email(&email))?;
    Ok(Json(state.applications.list_by_email(&email)?))
}

async fn serve_resume(
    state: DocumentState,
    principal: Principal,
    id: String,
    disposition: Disposition,
) -> ApiResult<Response> {
    let application = state.applications.get(&id)?;
    AccessGate::require_owner_or_admin(&principal, Owner::Email(&application.record.submitted_by))?;

    let file = state.resumes.open(&application.record.resume_path).await?;
    let name = download_name(
        &application.record.form.name,
        &application.record.form.job_title,
        &file.file_name,
    );
    Ok(resume_response(file, &name, disposition))
}

pub async fn download_resume(
    State(state): State<DocumentState>,
    AnyPrincipal(principal): AnyPrincipal,
    PathParam(id): PathParam<String>,
) -> ApiResult<Response> {
    serve_resume(state, principal, id, Disposition::Attachment).await
}

pub async fn view_resume(
    State(state): State<DocumentState>,
    AnyPrincipal(principal): AnyPrincipal,
    PathParam(id): PathParam<String>,
) -> ApiResult<Response> {
    serve_resume(state, principal, id, Disposition::Inline).await
}
