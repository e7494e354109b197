//! Application state for each variant.

use std::sync::Arc;

use axum::extract::FromRef;
use jobboard_auth::{AccessGate, CredentialStore, PasswordHasher, TokenService};
use jobboard_docstore::{
    AdminRepository, ApplicationRepository as DocApplicationRepository, CompanyRepository, DocumentStore,
    JobRepository as DocJobRepository, UserRepository as DocUserRepository,
};
use jobboard_sqlstore::{
    ApplicationRepository as SqlApplicationRepository, JobRepository as SqlJobRepository, SqlStore,
    UserRepository as SqlUserRepository,
};
use jobboard_storage::ResumeStore;
use tracing::info;

use crate::config::ApiConfig;
use crate::credentials::{DocumentCredentials, RelationalCredentials};
use crate::error::ApiResult;

fn build_gate(config: &ApiConfig, store: Arc<dyn CredentialStore>) -> ApiResult<AccessGate> {
    let tokens = TokenService::new(&config.secret_key, &config.algorithm, config.token_lifetime_minutes)?;
    Ok(AccessGate::new(
        Arc::new(tokens),
        PasswordHasher::with_cost(config.bcrypt_cost)?,
        store,
    ))
}

async fn open_resumes(config: &ApiConfig) -> ApiResult<ResumeStore> {
    let resumes = ResumeStore::new(config.upload_dir.clone());
    resumes.init().await?;
    Ok(resumes)
}

/// Shared state of the document-store variant.
#[derive(Clone)]
pub struct DocumentState {
    pub config: Arc<ApiConfig>,
    pub gate: AccessGate,
    pub store: DocumentStore,
    pub admins: AdminRepository,
    pub users: DocUserRepository,
    pub companies: CompanyRepository,
    pub jobs: DocJobRepository,
    pub applications: DocApplicationRepository,
    pub resumes: ResumeStore,
}

impl DocumentState {
    /// Open the on-disk store named by the config.
    pub async fn new(config: ApiConfig) -> ApiResult<Self> {
        let store = DocumentStore::open(&config.document_store_path)?;
        Self::with_store(config, store).await
    }

    pub async fn with_store(config: ApiConfig, store: DocumentStore) -> ApiResult<Self> {
        let admins = AdminRepository::new(store.clone());
        let users = DocUserRepository::new(store.clone());
        let credentials = DocumentCredentials::new(admins.clone(), users.clone());
        let gate = build_gate(&config, Arc::new(credentials))?;
        let resumes = open_resumes(&config).await?;

        Ok(Self {
            companies: CompanyRepository::new(store.clone()),
            jobs: DocJobRepository::new(store.clone()),
            applications: DocApplicationRepository::new(store.clone(), config.duplicate_policy),
            config: Arc::new(config),
            gate,
            store,
            admins,
            users,
            resumes,
        })
    }

    /// Create the configured admin unless one with that email exists.
    pub async fn seed_admin(&self, email: &str, password: &str) -> ApiResult<()> {
        if self.admins.find_by_email(email)?.is_some() {
            return Ok(());
        }
        let hash = self.gate.hasher().hash(password).await?;
        self.admins.create(email, &hash)?;
        info!(email, "Seeded admin account");
        Ok(())
    }
}

impl FromRef<DocumentState> for AccessGate {
    fn from_ref(state: &DocumentState) -> Self {
        state.gate.clone()
    }
}

/// Shared state of the relational variant.
#[derive(Clone)]
pub struct RelationalState {
    pub config: Arc<ApiConfig>,
    pub gate: AccessGate,
    pub store: SqlStore,
    pub users: SqlUserRepository,
    pub jobs: SqlJobRepository,
    pub applications: SqlApplicationRepository,
    pub resumes: ResumeStore,
}

impl RelationalState {
    /// Connect to the database named by the config and run migrations.
    pub async fn new(config: ApiConfig) -> ApiResult<Self> {
        let store = SqlStore::connect(&config.database_url, config.database_max_connections).await?;
        Self::with_store(config, store).await
    }

    pub async fn with_store(config: ApiConfig, store: SqlStore) -> ApiResult<Self> {
        let users = store.users();
        let gate = build_gate(&config, Arc::new(RelationalCredentials::new(users.clone())))?;
        let resumes = open_resumes(&config).await?;

        Ok(Self {
            jobs: store.jobs(),
            applications: store.applications(config.duplicate_policy),
            config: Arc::new(config),
            gate,
            store,
            users,
            resumes,
        })
    }

    /// Make sure the configured admin exists; its username is the email's local part.
    pub async fn seed_admin(&self, email: &str, password: &str) -> ApiResult<()> {
        if let Some(row) = self.users.find_by_email(email).await? {
            if row.is_admin {
                return Ok(());
            }
        }
        let username = email.split('@').next().unwrap_or(email);
        let hash = self.gate.hasher().hash(password).await?;
        self.users.ensure_admin(email, username, &hash).await?;
        info!(email, "Seeded admin account");
        Ok(())
    }
}

impl FromRef<RelationalState> for AccessGate {
    fn from_ref(state: &RelationalState) -> Self {
        state.gate.clone()
    }
}
