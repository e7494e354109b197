//! Relational store on SQLite.
//!
//! This crate provides:
//! - Pool construction and embedded migrations
//! - User queries, including admin seeding
//! - Filtered, paginated job queries with partial updates
//! - Application queries with the duplicate-application pre-check

pub mod applications;
pub mod error;
pub mod jobs;
pub mod pool;
pub mod users;

pub use applications::ApplicationRepository;
pub use error::{SqlStoreError, SqlStoreResult};
pub use jobs::JobRepository;
pub use pool::SqlStore;
pub use users::{User, UserRepository, UserRow};
