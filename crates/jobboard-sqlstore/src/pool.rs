//! Connection pool and migrations.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::applications::ApplicationRepository;
use crate::error::SqlStoreResult;
use crate::jobs::JobRepository;
use crate::users::UserRepository;
use jobboard_models::DuplicatePolicy;

/// Handle to the relational database. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    /// Connect to `url`, creating the database file if needed, and run migrations.
    pub async fn connect(url: &str, max_connections: u32) -> SqlStoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        info!(url = %redact(url), "Connected to relational store");
        Ok(store)
    }

    /// A private in-memory database. A single pinned connection keeps it alive.
    pub async fn in_memory() -> SqlStoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> SqlStoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn jobs(&self) -> JobRepository {
        JobRepository::new(self.pool.clone())
    }

    pub fn applications(&self, policy: DuplicatePolicy) -> ApplicationRepository {
        ApplicationRepository::new(self.pool.clone(), policy)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Strip query parameters before a URL hits the logs.
fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_runs_migrations() {
        let store = SqlStore::in_memory().await.unwrap();
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'jobs', 'applications')",
        )
        .fetch_one(store.pool())
        .await
        .unwrap();
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_connect_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.db");
        let url = format!("sqlite://{}", path.display());
        let store = SqlStore::connect(&url, 2).await.unwrap();
        store.close().await;
        assert!(path.exists());
    }

    #[test]
    fn test_redact_drops_query() {
        assert_eq!(redact("sqlite://job_board.db?mode=rwc"), "sqlite://job_board.db");
    }
}
