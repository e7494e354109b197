//! Signed bearer tokens.

use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{AuthError, AuthResult};

/// Default token lifetime in minutes.
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 30;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal email)
    pub sub: String,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Caller-supplied claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Token returned by the login endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

impl AccessToken {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            access_token: token.into(),
            token_type: "bearer".to_string(),
        }
    }
}

/// Issues and verifies HMAC-signed tokens with a process-wide secret.
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service. Only the HMAC family (HS256/HS384/HS512) is accepted.
    pub fn new(secret: &str, algorithm: &str, lifetime_minutes: i64) -> AuthResult<Self> {
        if secret.is_empty() {
            return Err(AuthError::config("secret key must not be empty"));
        }

        let algorithm = Algorithm::from_str(algorithm.trim())
            .map_err(|_| AuthError::config(format!("unknown algorithm '{}'", algorithm)))?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AuthError::config(format!(
                "algorithm {:?} is not an HMAC algorithm",
                algorithm
            )));
        }

        if lifetime_minutes <= 0 {
            return Err(AuthError::config("token lifetime must be positive"));
        }

        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            lifetime: Duration::minutes(lifetime_minutes),
        })
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `subject` with the configured lifetime.
    pub fn issue(&self, subject: &str) -> AuthResult<String> {
        self.issue_with_claims(subject, Map::new())
    }

    /// Issue a token carrying additional claims. Reserved claim names in
    /// `extra` are ignored.
    pub fn issue_with_claims(&self, subject: &str, extra: Map<String, Value>) -> AuthResult<String> {
        self.sign(subject, extra, self.lifetime)
    }

    /// Issue a token with an explicit lifetime, which may be negative.
    pub fn issue_with_lifetime(&self, subject: &str, lifetime: Duration) -> AuthResult<String> {
        self.sign(subject, Map::new(), lifetime)
    }

    fn sign(&self, subject: &str, mut extra: Map<String, Value>, lifetime: Duration) -> AuthResult<String> {
        for reserved in ["sub", "exp", "iat"] {
            extra.remove(reserved);
        }

        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            extra,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }

    /// Verify signature and expiry, returning the full claims.
    pub fn verify_claims(&self, token: &str) -> AuthResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = %e, "Token rejected");
            AuthError::InvalidToken
        })?;

        if data.claims.sub.trim().is_empty() {
            debug!("Token rejected: empty subject");
            return Err(AuthError::InvalidToken);
        }

        Ok(data.claims)
    }

    /// Verify a token and return its subject.
    pub fn verify(&self, token: &str) -> AuthResult<String> {
        self.verify_claims(token).map(|claims| claims.sub)
    }
}
