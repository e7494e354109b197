//! Relational variant API tests, each against a fresh in-memory SQLite database.

mod common;

use axum::http::{header, StatusCode};
use axum::Router;
use jobboard_api::{create_relational_router, RelationalState, Variant};
use jobboard_sqlstore::SqlStore;
use serde_json::{json, Value};
use tempfile::TempDir;

use common::*;

struct TestApp {
    router: Router,
    state: RelationalState,
    uploads: TempDir,
}

async fn app() -> TestApp {
    let uploads = TempDir::new().unwrap();
    let config = test_config(Variant::Relational, uploads.path());
    let state = RelationalState::with_store(config, SqlStore::in_memory().await.unwrap())
        .await
        .unwrap();
    state.seed_admin("admin@x.com", "admin-pw").await.unwrap();
    TestApp {
        router: create_relational_router(state.clone(), None),
        state,
        uploads,
    }
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        json("POST", "/auth/login", json!({"email": email, "password": password}), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["access_token"].as_str().unwrap().to_string()
}

async fn register(app: &Router, email: &str, username: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        json(
            "POST",
            "/auth/register",
            json!({"email": email, "username": username, "password": password}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    login(app, email, password).await
}

async fn create_job(app: &Router, admin: &str, location: &str, salary: f64) -> i64 {
    let (status, body) = call(
        app,
        json(
            "POST",
            "/jobs",
            json!({
                "title": "Data Engineer",
                "description": "Pipelines",
                "location": location,
                "salary": salary
            }),
            Some(admin),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["id"].as_i64().unwrap()
}

async fn apply(app: &Router, token: &str, job_id: i64, file_name: &str) -> (StatusCode, Value) {
    let job_id = job_id.to_string();
    let fields = [
        ("job_id", job_id.as_str()),
        ("name", "Ada"),
        ("email", "ada@example.com"),
        ("cover_letter", "Hello"),
    ];
    let file = FilePart {
        field: "resume",
        file_name,
        bytes: b"%PDF-1.7",
    };
    call(app, multipart("/applications", &fields, Some(file), token)).await
}

#[tokio::test]
async fn test_register_hides_password_and_rejects_duplicates() {
    let app = app().await;

    let (status, body) = call(
        &app.router,
        json(
            "POST",
            "/auth/register",
            json!({"email": "a@x.com", "username": "ada", "password": "pw1"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["is_admin"], false);
    assert!(body.get("hashed_password").is_none());

    let (status, body) = call(
        &app.router,
        json(
            "POST",
            "/auth/register",
            json!({"email": "a@x.com", "username": "other", "password": "pw1"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already registered");

    let (status, body) = call(
        &app.router,
        json(
            "POST",
            "/auth/register",
            json!({"email": "b@x.com", "username": "ada", "password": "pw1"}),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Username already taken");
}

#[tokio::test]
async fn test_me() {
    let app = app().await;
    let token = register(&app.router, "a@x.com", "ada", "pw1").await;

    let (status, body) = call(&app.router, get("/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ada");

    let (status, _) = call(&app.router, get("/auth/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_seed_admin_is_idempotent() {
    let app = app().await;
    app.state.seed_admin("admin@x.com", "admin-pw").await.unwrap();

    let token = login(&app.router, "admin@x.com", "admin-pw").await;
    let (_, body) = call(&app.router, get("/auth/me", Some(&token))).await;
    assert_eq!(body["is_admin"], true);
    assert_eq!(body["username"], "admin");
}

#[tokio::test]
async fn test_job_writes_need_admin() {
    let app = app().await;
    let admin = login(&app.router, "admin@x.com", "admin-pw").await;
    let user = register(&app.router, "a@x.com", "ada", "pw1").await;
    let body = json!({"title": "T", "description": "", "location": "Remote", "salary": 1.0});

    let (status, _) = call(&app.router, json("POST", "/jobs", body.clone(), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, resp) = call(&app.router, json("POST", "/jobs", body.clone(), Some(&user))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(resp["detail"], "Not enough permissions");
    let (status, resp) = call(&app.router, json("POST", "/jobs", body, Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["status"], "active");

    let id = resp["id"].as_i64().unwrap();
    let (status, _) = call(&app.router, delete(&format!("/jobs/{id}"), Some(&user))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_job_crud_and_filters() {
    let app = app().await;
    let admin = login(&app.router, "admin@x.com", "admin-pw").await;
    let berlin = create_job(&app.router, &admin, "Berlin", 5000.0).await;
    create_job(&app.router, &admin, "Remote", 9000.0).await;

    let (_, body) = call(&app.router, get("/jobs?location=berl", None)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], berlin);

    let (_, body) = call(&app.router, get("/jobs?min_salary=6000", None)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["location"], "Remote");

    let (_, body) = call(&app.router, get("/jobs?skip=1&limit=10", None)).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = call(&app.router, get("/jobs?limit=-1", None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = call(
        &app.router,
        json("PUT", &format!("/jobs/{berlin}"), json!({"status": "filled"}), Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "filled");
    assert_eq!(body["location"], "Berlin");
    assert!(!body["updated_at"].is_null());

    let (status, body) = call(
        &app.router,
        json("PUT", "/jobs/999", json!({"title": "X"}), Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Job not found");

    let (status, body) = call(&app.router, delete(&format!("/jobs/{berlin}"), Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Job deleted successfully");
    let (status, _) = call(&app.router, delete(&format!("/jobs/{berlin}"), Some(&admin))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&app.router, get(&format!("/jobs/{berlin}"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app.router, get("/jobs/abc", None)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_own_applications_end_to_end() {
    let app = app().await;
    let admin = login(&app.router, "admin@x.com", "admin-pw").await;
    let job = create_job(&app.router, &admin, "Berlin", 5000.0).await;
    let a = register(&app.router, "a@x.com", "ada", "pw1").await;
    let b = register(&app.router, "b@x.com", "bob", "pw2").await;

    let (status, body) = call(&app.router, get("/applications", Some(&a))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, created) = apply(&app.router, &a, job, "cv.PDF").await;
    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(created["status"], "pending");
    assert_eq!(created["cover_letter"], "Hello");
    assert!(created["resume_url"].as_str().unwrap().ends_with(".pdf"));
    let (status, _) = apply(&app.router, &b, job, "cv.docx").await;
    assert_eq!(status, StatusCode::OK);

    let (_, mine) = call(&app.router, get("/applications", Some(&a))).await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["id"], created["id"]);
    assert_eq!(mine[0]["job"]["id"], job);

    let (_, all) = call(&app.router, get("/applications", Some(&admin))).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (status, by_job) = call(&app.router, get(&format!("/applications/job/{job}"), Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_job.as_array().unwrap().len(), 2);
    let (status, _) = call(&app.router, get(&format!("/applications/job/{job}"), Some(&a))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rejected_resume_type_leaves_nothing_behind() {
    let app = app().await;
    let admin = login(&app.router, "admin@x.com", "admin-pw").await;
    let job = create_job(&app.router, &admin, "Berlin", 5000.0).await;
    let a = register(&app.router, "a@x.com", "ada", "pw1").await;

    let (status, body) = apply(&app.router, &a, job, "setup.exe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Only PDF, DOC, and DOCX files are allowed");

    assert_eq!(file_count(app.uploads.path()), 0);
    let (_, all) = call(&app.router, get("/applications", Some(&admin))).await;
    assert_eq!(all, json!([]));
}

#[tokio::test]
async fn test_duplicate_and_unknown_job_write_no_file() {
    let app = app().await;
    let admin = login(&app.router, "admin@x.com", "admin-pw").await;
    let job = create_job(&app.router, &admin, "Berlin", 5000.0).await;
    let a = register(&app.router, "a@x.com", "ada", "pw1").await;

    assert_eq!(apply(&app.router, &a, job, "cv.pdf").await.0, StatusCode::OK);
    let (status, body) = apply(&app.router, &a, job, "cv.pdf").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "User has already applied for this job");

    let (status, _) = apply(&app.router, &a, 4242, "cv.pdf").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(file_count(app.uploads.path()), 1);
}

#[tokio::test]
async fn test_application_access_by_owner_or_admin() {
    let app = app().await;
    let admin = login(&app.router, "admin@x.com", "admin-pw").await;
    let job = create_job(&app.router, &admin, "Berlin", 5000.0).await;
    let a = register(&app.router, "a@x.com", "ada", "pw1").await;
    let b = register(&app.router, "b@x.com", "bob", "pw2").await;

    let (_, created) = apply(&app.router, &a, job, "cv.pdf").await;
    let id = created["id"].as_i64().unwrap();
    let path = format!("/applications/{id}");

    let (status, body) = call(&app.router, get(&path, Some(&a))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["title"], "Data Engineer");
    let (status, _) = call(&app.router, get(&path, Some(&b))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&app.router, get(&path, Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app.router, get("/applications/999", Some(&admin))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Application not found");

    let response = send(&app.router, get(&format!("{path}/resume/download"), Some(&a))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/octet-stream");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"resume_Ada_Data Engineer.pdf\""
    );
    assert_eq!(body_bytes(response).await, b"%PDF-1.7");

    let response = send(&app.router, get(&format!("{path}/resume/view"), Some(&admin))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");

    let (status, _) = call(&app.router, get(&format!("{path}/resume/view"), Some(&b))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_updates_status() {
    let app = app().await;
    let admin = login(&app.router, "admin@x.com", "admin-pw").await;
    let job = create_job(&app.router, &admin, "Berlin", 5000.0).await;
    let a = register(&app.router, "a@x.com", "ada", "pw1").await;
    let (_, created) = apply(&app.router, &a, job, "cv.doc").await;
    let path = format!("/applications/{}", created["id"]);

    let (status, _) = call(&app.router, json("PUT", &path, json!({"status": "accepted"}), Some(&a))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app.router,
        json("PUT", &path, json!({"status": "accepted"}), Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "accepted");

    let (status, _) = call(
        &app.router,
        json("PUT", &path, json!({"status": "hired"}), Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = call(
        &app.router,
        json("PUT", "/applications/999", json!({"status": "rejected"}), Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleting_job_removes_its_applications() {
    let app = app().await;
    let admin = login(&app.router, "admin@x.com", "admin-pw").await;
    let job = create_job(&app.router, &admin, "Berlin", 5000.0).await;
    let a = register(&app.router, "a@x.com", "ada", "pw1").await;
    assert_eq!(apply(&app.router, &a, job, "cv.pdf").await.0, StatusCode::OK);

    let (status, _) = call(&app.router, delete(&format!("/jobs/{job}"), Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, mine) = call(&app.router, get("/applications", Some(&a))).await;
    assert_eq!(mine, json!([]));
}
