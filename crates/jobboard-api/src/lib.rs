//! Axum HTTP API server for the job board.
//!
//! This crate provides:
//! - The document-store and relational route tables
//! - Bearer-token extractors backed by the access gate
//! - Multipart resume upload and download
//! - Per-IP rate limiting on login and registration
//! - Security headers, request IDs and Prometheus metrics

pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod upload;

pub use config::{ApiConfig, Variant};
pub use error::{ApiError, ApiResult};
pub use routes::{create_document_router, create_relational_router};
pub use state::{DocumentState, RelationalState};
