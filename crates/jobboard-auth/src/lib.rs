//! Authentication core shared by both store variants.
//!
//! This crate provides:
//! - bcrypt password hashing on the blocking pool
//! - HMAC-signed bearer tokens carrying the principal's email
//! - The access gate: token to principal resolution and role checks
//! - The `CredentialStore` seam implemented by each store

pub mod error;
pub mod gate;
pub mod password;
pub mod token;

pub use error::{AuthError, AuthResult};
pub use gate::{AccessGate, Credential, CredentialStore, Owner, Partition};
pub use password::PasswordHasher;
pub use token::{AccessToken, Claims, TokenService, DEFAULT_TOKEN_LIFETIME_MINUTES};
