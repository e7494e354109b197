//! Embedded document store.
//!
//! This crate provides:
//! - A sled-backed store with one tree per collection
//! - Typed records validated before they are persisted
//! - Repositories for admins, users, companies, jobs and applications
//! - Email and duplicate-application pre-checks at write time

pub mod client;
pub mod error;
pub mod metrics;
pub mod repos;
pub mod types;

pub use client::DocumentStore;
pub use error::{DocStoreError, DocStoreResult};
pub use repos::{
    AdminRepository, ApplicationRepository, CompanyRepository, JobRepository, UserRepository,
};
pub use types::{AdminRecord, Record, Stored, UserRecord};
