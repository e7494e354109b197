//! Job application models for both store variants.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::job::Job;
use crate::ParseEnumError;

/// Message reported when a user applies to the same job twice.
pub const DUPLICATE_APPLICATION_MESSAGE: &str = "User has already applied for this job";

/// Review status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "reviewed" => Ok(ApplicationStatus::Reviewed),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(ParseEnumError::new("application status", s)),
        }
    }
}

/// Whether a user may submit more than one application for the same job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    Allow,
    Reject,
}

impl DuplicatePolicy {
    pub fn rejects_duplicates(&self) -> bool {
        matches!(self, DuplicatePolicy::Reject)
    }
}

impl FromStr for DuplicatePolicy {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allow" => Ok(DuplicatePolicy::Allow),
            "reject" => Ok(DuplicatePolicy::Reject),
            _ => Err(ParseEnumError::new("duplicate policy", s)),
        }
    }
}

// ============================================================================
// Document variant
// ============================================================================

/// Applicant-supplied fields of a document-store application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForm {
    #[validate(length(min = 1))]
    pub job_id: String,
    pub job_title: String,
    pub company_name: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default, rename = "currentCTC")]
    pub current_ctc: Option<String>,
    #[serde(default, rename = "expectedCTC")]
    pub expected_ctc: Option<String>,
    #[serde(default)]
    pub notice_period: Option<String>,
    #[serde(default, rename = "portfolioURL")]
    #[validate(url)]
    pub portfolio_url: Option<String>,
}

/// A stored document-store application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    #[serde(flatten)]
    #[validate(nested)]
    pub form: ApplicationForm,
    pub status: ApplicationStatus,
    pub applied_on: DateTime<Utc>,
    #[serde(rename = "resume_path")]
    #[validate(length(min = 1))]
    pub resume_path: String,
    /// Email of the principal that submitted the application.
    #[validate(email)]
    pub submitted_by: String,
}

impl ApplicationRecord {
    pub fn new(form: ApplicationForm, resume_path: impl Into<String>, submitted_by: impl Into<String>) -> Self {
        Self {
            form,
            status: ApplicationStatus::Pending,
            applied_on: Utc::now(),
            resume_path: resume_path.into(),
            submitted_by: submitted_by.into(),
        }
    }
}

// ============================================================================
// Relational variant
// ============================================================================

/// A persisted application row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub user_id: i64,
    pub job_id: i64,
    pub name: String,
    pub email: String,
    pub resume_url: String,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

/// An application together with the job it targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    pub application: Application,
    pub job: Job,
}

/// Applicant-supplied fields of a relational application.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewApplication {
    pub job_id: i64,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

/// Admin status change for an application.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApplicationStatusUpdate {
    pub status: ApplicationStatus,
}
