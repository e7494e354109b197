//! Request handlers.

use serde::Serialize;

pub mod document;
pub mod health;
pub mod relational;
pub mod resume;

pub use health::*;

/// Body of endpoints that only acknowledge an action.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
