//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::ApiConfig;
use crate::handlers::document::{applications as doc_applications, auth as doc_auth, company, jobs as doc_jobs};
use crate::handlers::relational::{applications as sql_applications, auth as sql_auth, jobs as sql_jobs};
use crate::handlers::{health, root};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, rate_limit_middleware, request_id, request_logging, security_headers, AuthRateLimiter};
use crate::state::{DocumentState, RelationalState};

/// Create the document-store variant router.
pub fn create_document_router(state: DocumentState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let limiter = AuthRateLimiter::new(state.config.auth_rate_limit_rps);

    // Login and registration, rate limited per client IP
    let credential_routes = Router::new()
        .route("/admin/register", post(doc_auth::register_admin))
        .route("/admin/login", post(doc_auth::admin_login))
        .route("/api/auth/register", post(doc_auth::register_user))
        .route("/api/auth/login", post(doc_auth::user_login))
        .route("/api/users", post(doc_auth::signup))
        .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));

    let admin_routes = Router::new()
        .route("/admin/jobs", post(doc_jobs::create_job))
        .route("/admin/applications", get(doc_applications::list_applications));

    let api_routes = Router::new()
        .route("/api/users/applications", get(doc_auth::own_applications))
        .route("/api/jobs", get(doc_jobs::list_jobs).post(doc_jobs::create_job))
        .route("/api/jobs/:id", get(doc_jobs::get_job))
        .route(
            "/api/company/profile",
            get(company::list_companies).post(company::create_company),
        )
        .route("/api/company/profile/:id", get(company::get_company))
        .route(
            "/api/applications",
            get(doc_applications::list_applications).post(doc_applications::submit_application),
        )
        .route("/api/applications/user/:email", get(doc_applications::applications_by_email))
        .route("/api/applications/:id/resume/download", get(doc_applications::download_resume))
        .route("/api/applications/:id/resume/view", get(doc_applications::view_resume));

    let config = state.config.clone();
    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(credential_routes)
        .merge(admin_routes)
        .merge(api_routes)
        .with_state(state);

    with_common_layers(router, &config, metrics_handle)
}

/// Create the relational variant router.
pub fn create_relational_router(state: RelationalState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let limiter = AuthRateLimiter::new(state.config.auth_rate_limit_rps);

    let credential_routes = Router::new()
        .route("/auth/register", post(sql_auth::register))
        .route("/auth/login", post(sql_auth::login))
        .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware));

    let job_routes = Router::new()
        .route("/jobs", get(sql_jobs::list_jobs).post(sql_jobs::create_job))
        .route(
            "/jobs/:id",
            get(sql_jobs::get_job)
                .put(sql_jobs::update_job)
                .delete(sql_jobs::delete_job),
        );

    let application_routes = Router::new()
        .route(
            "/applications",
            get(sql_applications::list_applications).post(sql_applications::submit_application),
        )
        .route("/applications/job/:job_id", get(sql_applications::applications_for_job))
        .route(
            "/applications/:id",
            get(sql_applications::get_application).put(sql_applications::update_status),
        )
        .route("/applications/:id/resume/download", get(sql_applications::download_resume))
        .route("/applications/:id/resume/view", get(sql_applications::view_resume));

    let config = state.config.clone();
    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/me", get(sql_auth::me))
        .merge(credential_routes)
        .merge(job_routes)
        .merge(application_routes)
        .with_state(state);

    with_common_layers(router, &config, metrics_handle)
}

fn with_common_layers(router: Router, config: &ApiConfig, metrics_handle: Option<PrometheusHandle>) -> Router {
    let router = match metrics_handle {
        Some(handle) => router.route("/metrics", get(move || async move { handle.render() })),
        None => router,
    };

    router
        // Multipart reads are capped by the layer below instead of axum's 2 MB default.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&config.cors_origins))
}
