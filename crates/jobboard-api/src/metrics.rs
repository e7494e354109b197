//! Prometheus metrics for the API server.

use std::sync::OnceLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Install the global Prometheus recorder.
///
/// Fails if a recorder is already installed in this process.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "jobboard_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "jobboard_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "jobboard_http_requests_in_flight";

    pub const LOGINS_TOTAL: &str = "jobboard_logins_total";
    pub const RESUME_UPLOADS_TOTAL: &str = "jobboard_resume_uploads_total";
    pub const RESUME_UPLOAD_BYTES: &str = "jobboard_resume_upload_bytes";

    pub const RATE_LIMIT_HITS_TOTAL: &str = "jobboard_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a login attempt against a credential partition.
pub fn record_login(partition: &str, success: bool) {
    let labels = [
        ("partition", partition.to_string()),
        ("outcome", if success { "success" } else { "failure" }.to_string()),
    ];
    counter!(names::LOGINS_TOTAL, &labels).increment(1);
}

/// Record an accepted resume upload.
pub fn record_resume_upload(extension: &str, bytes: usize) {
    let labels = [("extension", extension.trim_start_matches('.').to_string())];
    counter!(names::RESUME_UPLOADS_TOTAL, &labels).increment(1);
    histogram!(names::RESUME_UPLOAD_BYTES).record(bytes as f64);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

fn id_segment() -> Option<&'static Regex> {
    static ID_SEGMENT: OnceLock<Option<Regex>> = OnceLock::new();
    ID_SEGMENT
        .get_or_init(|| Regex::new(r"^(?:[0-9]+|[0-9a-f]{24})$").ok())
        .as_ref()
}

/// Sanitize path for metrics labels: numeric and document IDs become `:id`,
/// email segments become `:email`.
fn sanitize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.contains('@') {
                ":email"
            } else if id_segment().is_some_and(|re| re.is_match(segment)) {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
