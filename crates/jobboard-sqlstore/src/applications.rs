//! Application queries.

use chrono::{DateTime, Utc};
use jobboard_models::{
    Application, ApplicationStatus, ApplicationWithJob, DuplicatePolicy, NewApplication,
    DUPLICATE_APPLICATION_MESSAGE,
};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::{SqlStoreError, SqlStoreResult};
use crate::jobs::JobRepository;

#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: i64,
    user_id: i64,
    job_id: i64,
    name: String,
    email: String,
    resume_url: String,
    cover_letter: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = SqlStoreError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            id: row.id,
            user_id: row.user_id,
            job_id: row.job_id,
            name: row.name,
            email: row.email,
            resume_url: row.resume_url,
            cover_letter: row.cover_letter,
            status: row.status.parse()?,
            created_at: row.created_at,
        })
    }
}

const APPLICATION_COLUMNS: &str =
    "id, user_id, job_id, name, email, resume_url, cover_letter, status, created_at";

/// Repository for the `applications` table.
#[derive(Debug, Clone)]
pub struct ApplicationRepository {
    pool: SqlitePool,
    policy: DuplicatePolicy,
}

impl ApplicationRepository {
    pub fn new(pool: SqlitePool, policy: DuplicatePolicy) -> Self {
        Self { pool, policy }
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    fn jobs(&self) -> JobRepository {
        JobRepository::new(self.pool.clone())
    }

    /// Newest-last page of applications, optionally restricted to one user.
    pub async fn list(&self, skip: i64, limit: i64, user_id: Option<i64>) -> SqlStoreResult<Vec<Application>> {
        let rows = match user_id {
            Some(user_id) => {
                let sql = format!(
                    "SELECT {} FROM applications WHERE user_id = ? ORDER BY id LIMIT ? OFFSET ?",
                    APPLICATION_COLUMNS
                );
                sqlx::query_as::<_, ApplicationRow>(&sql)
                    .bind(user_id)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM applications ORDER BY id LIMIT ? OFFSET ?",
                    APPLICATION_COLUMNS
                );
                sqlx::query_as::<_, ApplicationRow>(&sql)
                    .bind(limit)
                    .bind(skip)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        rows.into_iter().map(Application::try_from).collect()
    }

    /// Like [`list`](Self::list), with each application's job attached.
    pub async fn list_with_jobs(
        &self,
        skip: i64,
        limit: i64,
        user_id: Option<i64>,
    ) -> SqlStoreResult<Vec<ApplicationWithJob>> {
        let jobs = self.jobs();
        let mut out = Vec::new();
        for application in self.list(skip, limit, user_id).await? {
            let job = jobs.get(application.job_id).await?;
            out.push(ApplicationWithJob { application, job });
        }
        Ok(out)
    }

    pub async fn get(&self, id: i64) -> SqlStoreResult<Application> {
        let sql = format!("SELECT {} FROM applications WHERE id = ?", APPLICATION_COLUMNS);
        sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| SqlStoreError::not_found("Application not found"))
            .and_then(Application::try_from)
    }

    /// An application together with the job it targets.
    pub async fn get_with_job(&self, id: i64) -> SqlStoreResult<ApplicationWithJob> {
        let application = self.get(id).await?;
        let job = self.jobs().get(application.job_id).await?;
        Ok(ApplicationWithJob { application, job })
    }

    pub async fn exists(&self, user_id: i64, job_id: i64) -> SqlStoreResult<bool> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM applications WHERE user_id = ? AND job_id = ?")
                .bind(user_id)
                .bind(job_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    /// Check that `job_id` exists and that the duplicate policy lets `user_id` apply.
    ///
    /// Run this before persisting the resume so a rejected submission leaves no file.
    pub async fn ensure_can_apply(&self, user_id: i64, job_id: i64) -> SqlStoreResult<()> {
        self.jobs().get(job_id).await?;

        if self.policy.rejects_duplicates() && self.exists(user_id, job_id).await? {
            warn!(user_id, job_id, "Duplicate application rejected");
            return Err(SqlStoreError::conflict(DUPLICATE_APPLICATION_MESSAGE));
        }
        Ok(())
    }

    /// Store an application. The check and the insert are not atomic.
    pub async fn create(
        &self,
        user_id: i64,
        application: &NewApplication,
        resume_url: &str,
    ) -> SqlStoreResult<Application> {
        self.ensure_can_apply(user_id, application.job_id).await?;

        let sql = format!(
            "INSERT INTO applications (user_id, job_id, name, email, resume_url, cover_letter, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {}",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(user_id)
            .bind(application.job_id)
            .bind(&application.name)
            .bind(&application.email)
            .bind(resume_url)
            .bind(&application.cover_letter)
            .bind(ApplicationStatus::Pending.as_str())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        info!(application_id = row.id, user_id, job_id = row.job_id, "Stored application");
        Application::try_from(row)
    }

    pub async fn update_status(&self, id: i64, status: ApplicationStatus) -> SqlStoreResult<Application> {
        let sql = format!(
            "UPDATE applications SET status = ? WHERE id = ? RETURNING {}",
            APPLICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(status.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| SqlStoreError::not_found("Application not found"))?;

        info!(application_id = id, status = %status, "Updated application status");
        Application::try_from(row)
    }

    /// All applications for an existing job.
    pub async fn list_by_job(&self, job_id: i64) -> SqlStoreResult<Vec<Application>> {
        self.jobs().get(job_id).await?;

        let sql = format!(
            "SELECT {} FROM applications WHERE job_id = ? ORDER BY id",
            APPLICATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Application::try_from).collect()
    }
}
