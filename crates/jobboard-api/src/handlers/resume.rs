//! Resume uploads and file responses.

use std::fmt::Display;
use std::future::Future;

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use jobboard_storage::{ResumeFile, ResumeKind, ResumeStore, OCTET_STREAM};
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::upload::UploadedFile;

/// Save `file`, then hand its reference to `insert`.
///
/// When the insert fails the saved file is deleted before the error is returned.
pub async fn save_then_insert<T, E, F, Fut>(
    resumes: &ResumeStore,
    owner: &str,
    job: &str,
    file: &UploadedFile,
    insert: F,
) -> ApiResult<T>
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Into<ApiError> + Display,
{
    let stored = resumes.save(owner, job, &file.file_name, &file.bytes).await?;
    metrics::record_resume_upload(stored.kind.extension(), file.bytes.len());

    match insert(stored.url.clone()).await {
        Ok(created) => Ok(created),
        Err(e) => {
            warn!(error = %e, file = %stored.file_name, "Application insert failed, removing resume");
            resumes.delete(&stored.url).await;
            Err(e.into())
        }
    }
}

/// How the browser should treat a served resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Rendered in place with the file's own content type.
    Inline,
    /// Saved to disk as an opaque binary.
    Attachment,
}

/// Name offered to the client: `resume_{applicant}_{job title}{ext}`.
pub fn download_name(applicant: &str, job_title: &str, stored_name: &str) -> String {
    let ext = ResumeKind::from_file_name(stored_name)
        .map(|k| k.extension())
        .unwrap_or_default();
    let name = format!("resume_{applicant}_{job_title}{ext}");
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

pub fn resume_response(file: ResumeFile, name: &str, disposition: Disposition) -> Response {
    let (content_type, kind) = match disposition {
        Disposition::Inline => (file.content_type, "inline"),
        Disposition::Attachment => (OCTET_STREAM, "attachment"),
    };

    let mut response = (StatusCode::OK, Body::from(file.bytes)).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    let disposition = format!("{kind}; filename=\"{name}\"");
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use axum::body::Bytes;

    use super::*;

    async fn resumes() -> (tempfile::TempDir, ResumeStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("uploads"));
        store.init().await.unwrap();
        (dir, store)
    }

    fn upload() -> UploadedFile {
        UploadedFile {
            file_name: "cv.pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.4"),
        }
    }

    fn stored_count(store: &ResumeStore) -> usize {
        std::fs::read_dir(store.root()).unwrap().count()
    }

    #[tokio::test]
    async fn test_failed_insert_removes_saved_resume() {
        let (_dir, store) = resumes().await;

        let err = save_then_insert(&store, "7", "3", &upload(), |url| async move {
            assert!(url.ends_with(".pdf"));
            Err::<(), _>(ApiError::internal("insert failed"))
        })
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(stored_count(&store), 0);
    }

    #[tokio::test]
    async fn test_successful_insert_keeps_resume() {
        let (_dir, store) = resumes().await;

        let url = save_then_insert(&store, "7", "3", &upload(), |url| async move {
            Ok::<_, ApiError>(url)
        })
        .await
        .unwrap();

        assert_eq!(stored_count(&store), 1);
        assert_eq!(store.open(&url).await.unwrap().bytes, b"%PDF-1.4");
    }

    fn file() -> ResumeFile {
        ResumeFile {
            file_name: "resume_1_2_00ff.docx".to_string(),
            content_type: ResumeKind::Docx.content_type(),
            bytes: b"doc".to_vec(),
        }
    }

    #[test]
    fn test_download_name() {
        assert_eq!(
            download_name("Ada", "Backend Engineer", "resume_1_2_00ff.pdf"),
            "resume_Ada_Backend Engineer.pdf"
        );
        assert_eq!(download_name("A\"da", "Ops/SRE", "x.doc"), "resume_A_da_Ops_SRE.doc");
    }

    #[test]
    fn test_attachment_is_octet_stream() {
        let response = resume_response(file(), "resume_Ada_Eng.docx", Disposition::Attachment);
        assert_eq!(response.headers()[header::CONTENT_TYPE], OCTET_STREAM);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume_Ada_Eng.docx\""
        );
    }

    #[test]
    fn test_inline_keeps_content_type() {
        let response = resume_response(file(), "resume_Ada_Eng.docx", Disposition::Inline);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .starts_with("inline;"));
    }
}
