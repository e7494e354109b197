//! Job queries.

use chrono::{DateTime, Utc};
use jobboard_models::{Job, JobFilter, JobUpdate, NewJob};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use crate::error::{SqlStoreError, SqlStoreResult};

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: i64,
    title: String,
    description: String,
    location: String,
    salary: f64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<JobRow> for Job {
    type Error = SqlStoreError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(Job {
            id: row.id,
            title: row.title,
            description: row.description,
            location: row.location,
            salary: row.salary,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const JOB_COLUMNS: &str = "id, title, description, location, salary, status, created_at, updated_at";

/// Repository for the `jobs` table.
#[derive(Debug, Clone)]
pub struct JobRepository {
    pool: SqlitePool,
}

impl JobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Jobs matching `filter`, ordered by ID.
    pub async fn list(&self, filter: &JobFilter) -> SqlStoreResult<Vec<Job>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM jobs WHERE 1 = 1", JOB_COLUMNS));

        if let Some(location) = filter.location.as_deref().filter(|l| !l.is_empty()) {
            query
                .push(" AND LOWER(location) LIKE ")
                .push_bind(format!("%{}%", location.to_lowercase()));
        }
        if let Some(min) = filter.min_salary {
            query.push(" AND salary >= ").push_bind(min);
        }
        if let Some(max) = filter.max_salary {
            query.push(" AND salary <= ").push_bind(max);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }

        query
            .push(" ORDER BY id LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.skip);

        let rows = query.build_query_as::<JobRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(Job::try_from).collect()
    }

    pub async fn find(&self, id: i64) -> SqlStoreResult<Option<Job>> {
        let sql = format!("SELECT {} FROM jobs WHERE id = ?", JOB_COLUMNS);
        sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Job::try_from)
            .transpose()
    }

    pub async fn get(&self, id: i64) -> SqlStoreResult<Job> {
        self.find(id)
            .await?
            .ok_or_else(|| SqlStoreError::not_found("Job not found"))
    }

    pub async fn create(&self, job: &NewJob) -> SqlStoreResult<Job> {
        let sql = format!(
            "INSERT INTO jobs (title, description, location, salary, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {}",
            JOB_COLUMNS
        );
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(&job.title)
            .bind(&job.description)
            .bind(&job.location)
            .bind(job.salary)
            .bind(job.status.as_str())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        info!(job_id = row.id, "Created job");
        Job::try_from(row)
    }

    /// Apply the fields present in `update`. An empty update leaves the row untouched.
    pub async fn update(&self, id: i64, update: &JobUpdate) -> SqlStoreResult<Job> {
        let current = self.get(id).await?;
        if update.is_empty() {
            return Ok(current);
        }

        let sql = format!(
            "UPDATE jobs SET title = ?, description = ?, location = ?, salary = ?, status = ?, updated_at = ? \
             WHERE id = ? RETURNING {}",
            JOB_COLUMNS
        );
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(update.title.as_ref().unwrap_or(&current.title))
            .bind(update.description.as_ref().unwrap_or(&current.description))
            .bind(update.location.as_ref().unwrap_or(&current.location))
            .bind(update.salary.unwrap_or(current.salary))
            .bind(update.status.unwrap_or(current.status).as_str())
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| SqlStoreError::not_found("Job not found"))?;

        info!(job_id = id, "Updated job");
        Job::try_from(row)
    }

    /// Delete a job. Its applications go with it.
    pub async fn delete(&self, id: i64) -> SqlStoreResult<()> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(SqlStoreError::not_found("Job not found"));
        }
        info!(job_id = id, "Deleted job");
        Ok(())
    }
}
