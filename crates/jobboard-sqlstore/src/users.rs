//! User queries.

use chrono::{DateTime, Utc};
use jobboard_models::Principal;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{SqlStoreError, SqlStoreResult};

/// A `users` row, password digest included. Never serialized.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub hashed_password: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            username: row.username,
            is_admin: row.is_admin,
            created_at: row.created_at,
        }
    }
}

impl UserRow {
    pub fn principal(&self) -> Principal {
        if self.is_admin {
            Principal::admin(self.id.to_string(), &self.email)
        } else {
            Principal::user(self.id.to_string(), &self.email)
        }
    }
}

const USER_COLUMNS: &str = "id, email, username, hashed_password, is_admin, created_at";

/// Repository for the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a regular user.
    pub async fn create(&self, email: &str, username: &str, hashed_password: &str) -> SqlStoreResult<UserRow> {
        self.insert(email, username, hashed_password, false).await
    }

    async fn insert(
        &self,
        email: &str,
        username: &str,
        hashed_password: &str,
        is_admin: bool,
    ) -> SqlStoreResult<UserRow> {
        if self.find_by_email(email).await?.is_some() {
            return Err(SqlStoreError::conflict("Email already registered"));
        }
        if self.find_by_username(username).await?.is_some() {
            return Err(SqlStoreError::conflict("Username already taken"));
        }

        let sql = format!(
            "INSERT INTO users (email, username, hashed_password, is_admin, created_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .bind(username)
            .bind(hashed_password)
            .bind(is_admin)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(SqlStoreError::from)
            .map_err(|e| {
                // lost the race against a concurrent registration
                if e.is_unique_violation() {
                    SqlStoreError::conflict("Email already registered")
                } else {
                    e
                }
            })?;

        info!(user_id = row.id, is_admin, "Registered user");
        Ok(row)
    }

    pub async fn find_by_email(&self, email: &str) -> SqlStoreResult<Option<UserRow>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        Ok(sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn find_by_username(&self, username: &str) -> SqlStoreResult<Option<UserRow>> {
        let sql = format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS);
        Ok(sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn find_by_id(&self, id: i64) -> SqlStoreResult<Option<UserRow>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        Ok(sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Make sure an admin with `email` exists, promoting an existing user if needed.
    pub async fn ensure_admin(&self, email: &str, username: &str, hashed_password: &str) -> SqlStoreResult<UserRow> {
        match self.find_by_email(email).await? {
            Some(row) if row.is_admin => Ok(row),
            Some(row) => {
                sqlx::query("UPDATE users SET is_admin = 1 WHERE id = ?")
                    .bind(row.id)
                    .execute(&self.pool)
                    .await?;
                info!(user_id = row.id, "Promoted user to admin");
                Ok(UserRow { is_admin: true, ..row })
            }
            None => self.insert(email, username, hashed_password, true).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::SqlStore;

    #[tokio::test]
    async fn test_create_and_find() {
        let users = SqlStore::in_memory().await.unwrap().users();
        let row = users.create("a@x.com", "ada", "$2b$04$h").await.unwrap();
        assert!(!row.is_admin);

        let by_email = users.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, row.id);
        let by_id = users.find_by_id(row.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "ada");
        assert!(users.find_by_id(row.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_and_username() {
        let users = SqlStore::in_memory().await.unwrap().users();
        users.create("a@x.com", "ada", "$2b$04$h").await.unwrap();

        let err = users.create("a@x.com", "other", "$2b$04$h").await.unwrap_err();
        assert!(matches!(err, SqlStoreError::Conflict(_)));
        let err = users.create("b@x.com", "ada", "$2b$04$h").await.unwrap_err();
        assert_eq!(err.to_string(), "Username already taken");
    }

    #[tokio::test]
    async fn test_ensure_admin_inserts_then_promotes() {
        let users = SqlStore::in_memory().await.unwrap().users();
        let admin = users.ensure_admin("root@x.com", "root", "$2b$04$h").await.unwrap();
        assert!(admin.is_admin);
        let again = users.ensure_admin("root@x.com", "root", "$2b$04$h").await.unwrap();
        assert_eq!(again.id, admin.id);

        let plain = users.create("a@x.com", "ada", "$2b$04$h").await.unwrap();
        let promoted = users.ensure_admin("a@x.com", "ignored", "ignored").await.unwrap();
        assert_eq!(promoted.id, plain.id);
        assert!(users.find_by_email("a@x.com").await.unwrap().unwrap().is_admin);
    }

    #[test]
    fn test_public_view_has_no_password() {
        let row = UserRow {
            id: 1,
            email: "a@x.com".to_string(),
            username: "ada".to_string(),
            hashed_password: "$2b$04$h".to_string(),
            is_admin: false,
            created_at: Utc::now(),
        };
        assert_eq!(row.principal().id, "1");
        let json = serde_json::to_string(&User::from(row)).unwrap();
        assert!(!json.contains("password"));
    }
}
