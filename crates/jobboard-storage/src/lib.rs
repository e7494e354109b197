//! Resume file storage.
//!
//! This crate provides:
//! - Extension checks for PDF, DOC and DOCX resumes
//! - Collision-free file naming per applicant and job
//! - Reads guarded against path traversal
//! - Content-type lookup for inline viewing

pub mod error;
pub mod kind;
pub mod store;

pub use error::{StorageError, StorageResult, RESUME_TYPE_ERROR};
pub use kind::{content_type_for, ResumeKind, OCTET_STREAM};
pub use store::{ResumeFile, ResumeStore, StoredResume, UPLOADS_URL_PREFIX};
