//! Typed documents and their collections.

use chrono::{DateTime, Utc};
use jobboard_models::{ApplicationRecord, CompanyProfile, JobPosting};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A document type bound to one collection.
///
/// Records are validated before every write and must deserialize cleanly on read.
pub trait Record: Serialize + DeserializeOwned + Validate + Send + Sync + 'static {
    const COLLECTION: &'static str;
}

/// A document together with its generated ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub record: T,
}

/// Administrator credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AdminRecord {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password_hash: String,
}

/// Registered job seeker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UserRecord {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Record for AdminRecord {
    const COLLECTION: &'static str = "admin_users";
}

impl Record for UserRecord {
    const COLLECTION: &'static str = "users";
}

impl Record for CompanyProfile {
    const COLLECTION: &'static str = "companies";
}

impl Record for JobPosting {
    const COLLECTION: &'static str = "jobs";
}

impl Record for ApplicationRecord {
    const COLLECTION: &'static str = "applications";
}
