//! API configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use jobboard_models::DuplicatePolicy;
use tracing::warn;

/// Signing secret used when SECRET_KEY is unset. Startup warns about it in production.
pub const DEFAULT_SECRET_KEY: &str = "your-secret-key-here-change-in-production";

/// Which backend the process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Document,
    Relational,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Document => "document",
            Variant::Relational => "relational",
        }
    }

    /// Duplicate-application policy used when none is configured.
    pub fn default_duplicate_policy(&self) -> DuplicatePolicy {
        match self {
            Variant::Document => DuplicatePolicy::Allow,
            Variant::Relational => DuplicatePolicy::Reject,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "document" | "docstore" => Ok(Variant::Document),
            "relational" | "sql" | "sqlite" => Ok(Variant::Relational),
            other => Err(format!("unknown variant '{}'", other)),
        }
    }
}

/// Credentials for the admin created at startup.
#[derive(Clone)]
pub struct SeedAdmin {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SeedAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// API server configuration.
#[derive(Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Backend variant
    pub variant: Variant,
    /// Token signing secret
    pub secret_key: String,
    /// Token signing algorithm (HS256/HS384/HS512)
    pub algorithm: String,
    /// Token lifetime in minutes
    pub token_lifetime_minutes: i64,
    /// bcrypt cost factor
    pub bcrypt_cost: u32,
    /// Relational store URL
    pub database_url: String,
    /// Relational store pool size
    pub database_max_connections: u32,
    /// Document store directory
    pub document_store_path: PathBuf,
    /// Resume upload directory
    pub upload_dir: PathBuf,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Whether one user may apply to a job more than once
    pub duplicate_policy: DuplicatePolicy,
    /// Max request body size
    pub max_body_size: usize,
    /// Login/registration requests per second per client IP
    pub auth_rate_limit_rps: u32,
    /// Expose /metrics
    pub metrics_enabled: bool,
    /// Environment (development/production)
    pub environment: String,
    /// Admin to create at startup
    pub seed_admin: Option<SeedAdmin>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("variant", &self.variant)
            .field("algorithm", &self.algorithm)
            .field("token_lifetime_minutes", &self.token_lifetime_minutes)
            .field("upload_dir", &self.upload_dir)
            .field("cors_origins", &self.cors_origins)
            .field("duplicate_policy", &self.duplicate_policy)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        let variant = Variant::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            variant,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            algorithm: "HS256".to_string(),
            token_lifetime_minutes: 30,
            bcrypt_cost: 12,
            database_url: "sqlite://job_board.db?mode=rwc".to_string(),
            database_max_connections: 5,
            document_store_path: PathBuf::from("jobboard-data"),
            upload_dir: PathBuf::from("uploads"),
            cors_origins: default_origins(),
            duplicate_policy: variant.default_duplicate_policy(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            auth_rate_limit_rps: 5,
            metrics_enabled: true,
            environment: "development".to_string(),
            seed_admin: None,
        }
    }
}

fn default_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let variant = match std::env::var("JOBBOARD_VARIANT") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}, falling back to {}", e, defaults.variant);
                defaults.variant
            }),
            Err(_) => defaults.variant,
        };

        let duplicate_policy = match std::env::var("APPLICATION_DUPLICATES") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}, using the {} default", e, variant);
                variant.default_duplicate_policy()
            }),
            Err(_) => variant.default_duplicate_policy(),
        };

        let seed_admin = match (
            std::env::var("SEED_ADMIN_EMAIL"),
            std::env::var("SEED_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(SeedAdmin { email, password })
            }
            _ => None,
        };

        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("API_PORT", defaults.port),
            variant,
            secret_key: std::env::var("SECRET_KEY").unwrap_or(defaults.secret_key),
            algorithm: std::env::var("ALGORITHM").unwrap_or(defaults.algorithm),
            token_lifetime_minutes: env_parse("ACCESS_TOKEN_EXPIRE_MINUTES", defaults.token_lifetime_minutes),
            bcrypt_cost: env_parse("BCRYPT_COST", defaults.bcrypt_cost),
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            database_max_connections: env_parse("DATABASE_MAX_CONNECTIONS", defaults.database_max_connections),
            document_store_path: std::env::var("DOCUMENT_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.document_store_path),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            cors_origins: std::env::var("ALLOWED_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            duplicate_policy,
            max_body_size: env_parse("MAX_BODY_SIZE", defaults.max_body_size),
            auth_rate_limit_rps: env_parse("AUTH_RATE_LIMIT_PER_SECOND", defaults.auth_rate_limit_rps),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            seed_admin,
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "JOBBOARD_VARIANT",
        "APPLICATION_DUPLICATES",
        "ALLOWED_ORIGINS",
        "API_PORT",
        "SEED_ADMIN_EMAIL",
        "SEED_ADMIN_PASSWORD",
        "METRICS_ENABLED",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ApiConfig::from_env();
        assert_eq!(config.variant, Variant::Document);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Allow);
        assert_eq!(config.cors_origins, default_origins());
        assert!(config.seed_admin.is_none());
        assert!(config.metrics_enabled);
    }

    #[test]
    #[serial]
    fn test_relational_defaults_to_reject() {
        clear_env();
        std::env::set_var("JOBBOARD_VARIANT", "relational");
        let config = ApiConfig::from_env();
        assert_eq!(config.variant, Variant::Relational);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);

        std::env::set_var("APPLICATION_DUPLICATES", "allow");
        assert_eq!(ApiConfig::from_env().duplicate_policy, DuplicatePolicy::Allow);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides_and_bad_values() {
        clear_env();
        std::env::set_var("ALLOWED_ORIGINS", "https://a.example, https://b.example,");
        std::env::set_var("API_PORT", "not-a-port");
        std::env::set_var("SEED_ADMIN_EMAIL", "root@x.com");
        std::env::set_var("SEED_ADMIN_PASSWORD", "pw");
        std::env::set_var("METRICS_ENABLED", "false");

        let config = ApiConfig::from_env();
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.seed_admin.as_ref().map(|s| s.email.as_str()), Some("root@x.com"));
        assert!(!config.metrics_enabled);
        assert!(!format!("{:?}", config.seed_admin).contains("\"pw\""));
        clear_env();
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!("Relational".parse::<Variant>().unwrap(), Variant::Relational);
        assert!("graph".parse::<Variant>().is_err());
    }
}
