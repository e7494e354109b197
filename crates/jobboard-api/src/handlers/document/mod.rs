//! Handlers of the document-store variant.

pub mod applications;
pub mod auth;
pub mod company;
pub mod jobs;
