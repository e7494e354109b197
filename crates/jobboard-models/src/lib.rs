//! Shared data models for the job board backend.
//!
//! This crate provides Serde-serializable types for:
//! - Principals and roles
//! - Company profiles
//! - Job postings (document store) and jobs (relational store)
//! - Applications for both store variants
//! - The duplicate-application policy

pub mod application;
pub mod company;
pub mod job;
pub mod posting;
pub mod principal;

// Re-export common types
pub use application::{
    Application, ApplicationForm, ApplicationRecord, ApplicationStatus, ApplicationStatusUpdate,
    ApplicationWithJob, DuplicatePolicy, NewApplication, DUPLICATE_APPLICATION_MESSAGE,
};
pub use company::CompanyProfile;
pub use job::{Job, JobFilter, JobStatus, JobUpdate, NewJob};
pub use posting::{JobPosting, PostingStatus};
pub use principal::{Principal, Role};

/// Error returned when parsing an enum from its wire representation fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
