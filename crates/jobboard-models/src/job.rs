//! Jobs held by the relational store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::ParseEnumError;

/// Job lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Active,
    Inactive,
    Filled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Inactive => "inactive",
            JobStatus::Filled => "filled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(JobStatus::Active),
            "inactive" => Ok(JobStatus::Inactive),
            "filled" => Ok(JobStatus::Filled),
            _ => Err(ParseEnumError::new("job status", s)),
        }
    }
}

/// A persisted job row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary: f64,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating a job.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewJob {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(range(min = 0.0))]
    pub salary: f64,
    #[serde(default)]
    pub status: JobStatus,
}

/// Partial update for a job. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct JobUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    #[validate(range(min = 0.0))]
    pub salary: Option<f64>,
    pub status: Option<JobStatus>,
}

impl JobUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.salary.is_none()
            && self.status.is_none()
    }
}

fn default_limit() -> i64 {
    100
}

/// Listing filter with offset/limit pagination.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JobFilter {
    #[serde(default)]
    #[validate(range(min = 0))]
    pub skip: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 0, max = 1000))]
    pub limit: i64,
    /// Case-insensitive substring match.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub min_salary: Option<f64>,
    #[serde(default)]
    pub max_salary: Option<f64>,
    #[serde(default)]
    pub status: Option<JobStatus>,
}

impl Default for JobFilter {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
            location: None,
            min_salary: None,
            max_salary: None,
            status: None,
        }
    }
}
