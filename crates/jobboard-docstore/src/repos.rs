//! Typed repositories, one per collection.

use chrono::Utc;
use jobboard_models::{
    ApplicationRecord, CompanyProfile, DuplicatePolicy, JobPosting, DUPLICATE_APPLICATION_MESSAGE,
};
use tracing::{info, warn};

use crate::client::DocumentStore;
use crate::error::{DocStoreError, DocStoreResult};
use crate::types::{AdminRecord, Stored, UserRecord};

/// Repository for administrator accounts.
#[derive(Clone)]
pub struct AdminRepository {
    store: DocumentStore,
}

impl AdminRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Register an admin. The email check and the insert are not atomic.
    pub fn create(&self, email: &str, password_hash: &str) -> DocStoreResult<Stored<AdminRecord>> {
        if self.find_by_email(email)?.is_some() {
            return Err(DocStoreError::conflict("Admin already exists"));
        }
        let admin = self.store.insert(AdminRecord {
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        })?;
        info!(admin_id = %admin.id, "Registered admin");
        Ok(admin)
    }

    pub fn find_by_email(&self, email: &str) -> DocStoreResult<Option<Stored<AdminRecord>>> {
        self.store.find_one::<AdminRecord, _>(|a| a.email == email)
    }
}

/// Repository for job seekers.
#[derive(Clone)]
pub struct UserRepository {
    store: DocumentStore,
}

impl UserRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Register a user. The email check and the insert are not atomic.
    pub fn create(&self, name: &str, email: &str, password_hash: &str) -> DocStoreResult<Stored<UserRecord>> {
        if self.find_by_email(email)?.is_some() {
            return Err(DocStoreError::conflict("User already exists"));
        }
        let user = self.store.insert(UserRecord {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        })?;
        info!(user_id = %user.id, "Registered user");
        Ok(user)
    }

    pub fn find_by_email(&self, email: &str) -> DocStoreResult<Option<Stored<UserRecord>>> {
        self.store.find_one::<UserRecord, _>(|u| u.email == email)
    }
}

/// Repository for company profiles.
#[derive(Clone)]
pub struct CompanyRepository {
    store: DocumentStore,
}

impl CompanyRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn create(&self, profile: CompanyProfile) -> DocStoreResult<Stored<CompanyProfile>> {
        self.store.insert(profile)
    }

    pub fn list(&self) -> DocStoreResult<Vec<Stored<CompanyProfile>>> {
        self.store.list()
    }

    pub fn get(&self, id: &str) -> DocStoreResult<Stored<CompanyProfile>> {
        self.store
            .get(id)?
            .ok_or_else(|| DocStoreError::not_found("Company not found"))
    }
}

/// Repository for job postings.
#[derive(Clone)]
pub struct JobRepository {
    store: DocumentStore,
}

impl JobRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn create(&self, posting: JobPosting) -> DocStoreResult<Stored<JobPosting>> {
        let job = self.store.insert(posting)?;
        info!(job_id = %job.id, "Created job posting");
        Ok(job)
    }

    /// Postings currently open for applications.
    pub fn list_open(&self) -> DocStoreResult<Vec<Stored<JobPosting>>> {
        self.store.filter::<JobPosting, _>(|p| p.status.is_listed())
    }

    pub fn get(&self, id: &str) -> DocStoreResult<Stored<JobPosting>> {
        self.store
            .get(id)?
            .ok_or_else(|| DocStoreError::not_found("Job not found"))
    }
}

/// Repository for job applications.
#[derive(Clone)]
pub struct ApplicationRepository {
    store: DocumentStore,
    policy: DuplicatePolicy,
}

impl ApplicationRepository {
    pub fn new(store: DocumentStore, policy: DuplicatePolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// True if `submitted_by` already has an application for `job_id`.
    pub fn has_applied(&self, job_id: &str, submitted_by: &str) -> DocStoreResult<bool> {
        Ok(self
            .store
            .find_one::<ApplicationRecord, _>(|a| a.form.job_id == job_id && a.submitted_by == submitted_by)?
            .is_some())
    }

    /// Store an application, applying the duplicate policy first.
    pub fn create(&self, record: ApplicationRecord) -> DocStoreResult<Stored<ApplicationRecord>> {
        if self.policy.rejects_duplicates() && self.has_applied(&record.form.job_id, &record.submitted_by)? {
            warn!(job_id = %record.form.job_id, "Duplicate application rejected");
            return Err(DocStoreError::conflict(DUPLICATE_APPLICATION_MESSAGE));
        }
        let application = self.store.insert(record)?;
        info!(
            application_id = %application.id,
            job_id = %application.record.form.job_id,
            "Stored application"
        );
        Ok(application)
    }

    pub fn list(&self) -> DocStoreResult<Vec<Stored<ApplicationRecord>>> {
        self.store.list()
    }

    /// Applications whose applicant email is `email`.
    pub fn list_by_email(&self, email: &str) -> DocStoreResult<Vec<Stored<ApplicationRecord>>> {
        self.store.filter::<ApplicationRecord, _>(|a| a.form.email == email)
    }

    /// Applications submitted by the principal with `email`.
    pub fn list_submitted_by(&self, email: &str) -> DocStoreResult<Vec<Stored<ApplicationRecord>>> {
        self.store.filter::<ApplicationRecord, _>(|a| a.submitted_by == email)
    }

    pub fn get(&self, id: &str) -> DocStoreResult<Stored<ApplicationRecord>> {
        self.store
            .get(id)?
            .ok_or_else(|| DocStoreError::not_found("Application not found"))
    }
}
