//! Resume persistence on the local filesystem.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};
use crate::kind::{content_type_for, ResumeKind};

/// URL prefix under which stored resumes are referenced.
pub const UPLOADS_URL_PREFIX: &str = "/uploads/";

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredResume {
    pub file_name: String,
    /// Reference stored on the application, `/uploads/{file_name}`
    pub url: String,
    pub kind: ResumeKind,
}

/// A resume read back from disk.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Resume files under one upload directory.
#[derive(Debug, Clone)]
pub struct ResumeStore {
    root: PathBuf,
}

impl ResumeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory if it is missing.
    pub async fn init(&self) -> StorageResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        info!(dir = %self.root.display(), "Resume upload directory ready");
        Ok(())
    }

    /// Check that `original_name` is an accepted resume, without touching disk.
    pub fn check(original_name: &str) -> StorageResult<ResumeKind> {
        ResumeKind::from_file_name(original_name).ok_or(StorageError::UnsupportedType)
    }

    /// Persist an upload as `resume_{owner}_{job}_{random}{ext}`.
    ///
    /// The extension is checked before anything is written.
    pub async fn save(&self, owner: &str, job: &str, original_name: &str, bytes: &[u8]) -> StorageResult<StoredResume> {
        let kind = Self::check(original_name)?;

        let token = Uuid::new_v4().simple().to_string();
        let file_name = format!(
            "resume_{}_{}_{}{}",
            sanitize(owner),
            sanitize(job),
            &token[..16],
            kind.extension()
        );

        tokio::fs::write(self.root.join(&file_name), bytes).await?;
        info!(file = %file_name, size = bytes.len(), "Saved resume");

        Ok(StoredResume {
            url: format!("{}{}", UPLOADS_URL_PREFIX, file_name),
            file_name,
            kind,
        })
    }

    /// Map a stored reference (`/uploads/x.pdf` or `x.pdf`) to a path inside the root.
    pub fn resolve(&self, reference: &str) -> StorageResult<(String, PathBuf)> {
        let name = reference
            .strip_prefix(UPLOADS_URL_PREFIX)
            .unwrap_or(reference)
            .to_string();

        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(StorageError::invalid_name(name));
        }

        let path = self.root.join(&name);
        Ok((name, path))
    }

    /// Read a stored resume.
    pub async fn open(&self, reference: &str) -> StorageResult<ResumeFile> {
        let (file_name, path) = self.resolve(reference)?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(file = %file_name, "Resume missing on disk");
                return Err(StorageError::NotFound(file_name));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(ResumeFile {
            content_type: content_type_for(&file_name),
            file_name,
            bytes,
        })
    }

    /// Remove a stored resume, logging instead of failing.
    pub async fn delete(&self, reference: &str) {
        let path = match self.resolve(reference) {
            Ok((_, path)) => path,
            Err(e) => {
                warn!(reference, error = %e, "Refusing to delete resume");
                return;
            }
        };

        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %e, "Failed to delete resume");
        }
    }
}

/// Keep only characters that are safe inside a file name.
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, ResumeStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ResumeStore::new(dir.path().join("uploads"));
        store.init().await.unwrap();
        (dir, store)
    }

    fn file_count(store: &ResumeStore) -> usize {
        std::fs::read_dir(store.root()).unwrap().count()
    }

    #[tokio::test]
    async fn test_save_then_open() {
        let (_dir, store) = store().await;
        let saved = store.save("7", "3", "My CV.PDF", b"%PDF-1.4").await.unwrap();

        assert!(saved.file_name.starts_with("resume_7_3_"));
        assert!(saved.file_name.ends_with(".pdf"));
        assert_eq!(saved.url, format!("/uploads/{}", saved.file_name));

        let file = store.open(&saved.url).await.unwrap();
        assert_eq!(file.bytes, b"%PDF-1.4");
        assert_eq!(file.content_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_rejected_type_writes_nothing() {
        let (_dir, store) = store().await;
        let err = store.save("7", "3", "virus.exe", b"MZ").await.unwrap_err();
        assert_eq!(err.to_string(), "Only PDF, DOC, and DOCX files are allowed");
        assert_eq!(file_count(&store), 0);
    }

    #[tokio::test]
    async fn test_names_are_unique_and_sanitized() {
        let (_dir, store) = store().await;
        let a = store.save("a@x.com", "../job", "cv.doc", b"1").await.unwrap();
        let b = store.save("a@x.com", "../job", "cv.doc", b"2").await.unwrap();
        assert_ne!(a.file_name, b.file_name);
        assert!(a.file_name.starts_with("resume_a_x_com____job_"));
        assert_eq!(file_count(&store), 2);
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let (_dir, store) = store().await;
        assert!(matches!(
            store.open("/uploads/../secret.pdf").await,
            Err(StorageError::InvalidName(_))
        ));
        assert!(store.open("nested/x.pdf").await.is_err());
        assert!(matches!(
            store.open("/uploads/missing.pdf").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_is_best_effort() {
        let (_dir, store) = store().await;
        let saved = store.save("1", "1", "cv.docx", b"x").await.unwrap();
        store.delete(&saved.url).await;
        assert_eq!(file_count(&store), 0);
        // already gone: no panic, no error
        store.delete(&saved.url).await;
        store.delete("../etc/passwd").await;
    }
}
