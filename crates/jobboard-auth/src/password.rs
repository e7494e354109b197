//! bcrypt password hashing.

use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// Cost range bcrypt accepts.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Salted one-way password hasher.
///
/// Both operations run on the blocking pool; bcrypt at production cost takes
/// long enough to stall an async worker.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Like [`PasswordHasher::new`], but rejects a cost bcrypt would refuse.
    pub fn with_cost(cost: u32) -> AuthResult<Self> {
        if !(MIN_COST..=MAX_COST).contains(&cost) {
            return Err(AuthError::config(format!(
                "bcrypt cost must be between {MIN_COST} and {MAX_COST}, got {cost}"
            )));
        }
        Ok(Self::new(cost))
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password. Every call picks a fresh salt.
    pub async fn hash(&self, plaintext: &str) -> AuthResult<String> {
        let plaintext = plaintext.to_string();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || {
            bcrypt::hash(plaintext, cost).map_err(|e| AuthError::Hashing(e.to_string()))
        })
        .await
        .map_err(|e| AuthError::Hashing(format!("Task join error: {}", e)))?
    }

    /// Check a plaintext password against a stored digest.
    ///
    /// A digest that bcrypt cannot parse never matches.
    pub async fn verify(&self, plaintext: &str, digest: &str) -> AuthResult<bool> {
        let plaintext = plaintext.to_string();
        let digest = digest.to_string();

        tokio::task::spawn_blocking(move || match bcrypt::verify(plaintext, &digest) {
            Ok(matched) => matched,
            Err(e) => {
                debug!(error = %e, "Stored password digest is malformed");
                false
            }
        })
        .await
        .map_err(|e| AuthError::Hashing(format!("Task join error: {}", e)))
    }
}
