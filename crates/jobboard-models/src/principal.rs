//! Authenticated identities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An identity resolved from a bearer token or a successful login.
///
/// `id` is the store's identifier for the principal: a document ID in the
/// document store, the stringified row ID in the relational store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role,
        }
    }

    pub fn admin(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(id, email, Role::Admin)
    }

    pub fn user(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(id, email, Role::User)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
