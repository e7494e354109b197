//! Access gate: resolves bearer tokens to principals and enforces roles.

use std::sync::Arc;

use async_trait::async_trait;
use jobboard_models::{Principal, Role};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{AuthError, AuthResult};
use crate::password::PasswordHasher;
use crate::token::{AccessToken, TokenService};

/// Half of the credential store a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Admin,
    User,
}

/// A principal together with its stored password digest.
#[derive(Debug, Clone)]
pub struct Credential {
    pub principal: Principal,
    pub password_hash: String,
}

/// Email-keyed credential lookup, implemented by each store.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_credential(&self, partition: Partition, email: &str) -> AuthResult<Option<Credential>>;
}

/// Identifier a resource is owned by.
#[derive(Debug, Clone, Copy)]
pub enum Owner<'a> {
    Id(&'a str),
    Email(&'a str),
}

/// Verifies tokens, looks principals up on every request and applies role checks.
#[derive(Clone)]
pub struct AccessGate {
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    store: Arc<dyn CredentialStore>,
}

impl AccessGate {
    pub fn new(tokens: Arc<TokenService>, hasher: PasswordHasher, store: Arc<dyn CredentialStore>) -> Self {
        Self { tokens, hasher, store }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    /// Check an email/password pair against `partition` and issue a token.
    pub async fn login(&self, partition: Partition, email: &str, password: &str) -> AuthResult<AccessToken> {
        let credential = match self.store.find_credential(partition, email).await? {
            Some(c) => c,
            None => {
                debug!(?partition, "Login for unknown email");
                return Err(AuthError::Unauthorized);
            }
        };

        if !self.hasher.verify(password, &credential.password_hash).await? {
            debug!(?partition, "Login with wrong password");
            return Err(AuthError::Unauthorized);
        }

        let mut extra = Map::new();
        extra.insert(
            "role".to_string(),
            Value::String(credential.principal.role.as_str().to_string()),
        );
        let token = self.tokens.issue_with_claims(&credential.principal.email, extra)?;
        Ok(AccessToken::bearer(token))
    }

    /// Resolve a token to a principal of `partition`.
    pub async fn authenticate(&self, token: &str, partition: Partition) -> AuthResult<Principal> {
        let email = self.subject(token)?;
        self.store
            .find_credential(partition, &email)
            .await?
            .map(|c| c.principal)
            .ok_or(AuthError::Unauthorized)
    }

    /// Resolve a token to an admin.
    ///
    /// A valid token whose subject is only a regular user is forbidden rather
    /// than unauthorized.
    pub async fn authenticate_admin(&self, token: &str) -> AuthResult<Principal> {
        let email = self.subject(token)?;

        if let Some(credential) = self.store.find_credential(Partition::Admin, &email).await? {
            if credential.principal.is_admin() {
                return Ok(credential.principal);
            }
            return Err(AuthError::Forbidden);
        }

        match self.store.find_credential(Partition::User, &email).await? {
            Some(_) => {
                warn!("Non-admin principal attempted an admin-only operation");
                Err(AuthError::Forbidden)
            }
            None => Err(AuthError::Unauthorized),
        }
    }

    /// Resolve a token to a regular user.
    pub async fn authenticate_user(&self, token: &str) -> AuthResult<Principal> {
        self.authenticate(token, Partition::User).await
    }

    /// Resolve a token against the admin partition first, then the user partition.
    pub async fn authenticate_any(&self, token: &str) -> AuthResult<Principal> {
        let email = self.subject(token)?;

        for partition in [Partition::Admin, Partition::User] {
            if let Some(credential) = self.store.find_credential(partition, &email).await? {
                return Ok(credential.principal);
            }
        }
        Err(AuthError::Unauthorized)
    }

    /// Allow admins and the resource owner; forbid everyone else.
    ///
    /// Emails match exactly, the same way the stores key accounts by email.
    pub fn require_owner_or_admin(principal: &Principal, owner: Owner<'_>) -> AuthResult<()> {
        if principal.role == Role::Admin {
            return Ok(());
        }

        let owns = match owner {
            Owner::Id(id) => principal.id == id,
            Owner::Email(email) => principal.email == email,
        };

        if owns {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }

    fn subject(&self, token: &str) -> AuthResult<String> {
        self.tokens.verify(token).map_err(|_| AuthError::Unauthorized)
    }
}
