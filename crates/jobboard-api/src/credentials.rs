//! `CredentialStore` adapters for both stores.

use async_trait::async_trait;
use jobboard_auth::{AuthError, AuthResult, Credential, CredentialStore, Partition};
use jobboard_docstore::{AdminRepository, UserRepository as DocUserRepository};
use jobboard_models::Principal;
use jobboard_sqlstore::UserRepository as SqlUserRepository;

/// Admins live in `admin_users`, users in `users`.
pub struct DocumentCredentials {
    admins: AdminRepository,
    users: DocUserRepository,
}

impl DocumentCredentials {
    pub fn new(admins: AdminRepository, users: DocUserRepository) -> Self {
        Self { admins, users }
    }
}

#[async_trait]
impl CredentialStore for DocumentCredentials {
    async fn find_credential(&self, partition: Partition, email: &str) -> AuthResult<Option<Credential>> {
        let credential = match partition {
            Partition::Admin => self
                .admins
                .find_by_email(email)
                .map_err(|e| AuthError::store(e.to_string()))?
                .map(|admin| Credential {
                    principal: Principal::admin(admin.id, admin.record.email),
                    password_hash: admin.record.password_hash,
                }),
            Partition::User => self
                .users
                .find_by_email(email)
                .map_err(|e| AuthError::store(e.to_string()))?
                .map(|user| Credential {
                    principal: Principal::user(user.id, user.record.email),
                    password_hash: user.record.password_hash,
                }),
        };
        Ok(credential)
    }
}

/// One `users` table; the admin partition is the rows with `is_admin` set.
pub struct RelationalCredentials {
    users: SqlUserRepository,
}

impl RelationalCredentials {
    pub fn new(users: SqlUserRepository) -> Self {
        Self { users }
    }
}

#[async_trait]
impl CredentialStore for RelationalCredentials {
    async fn find_credential(&self, partition: Partition, email: &str) -> AuthResult<Option<Credential>> {
        let row = self
            .users
            .find_by_email(email)
            .await
            .map_err(|e| AuthError::store(e.to_string()))?;

        Ok(row
            .filter(|r| partition == Partition::User || r.is_admin)
            .map(|r| Credential {
                principal: r.principal(),
                password_hash: r.hashed_password,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobboard_docstore::DocumentStore;
    use jobboard_sqlstore::SqlStore;

    #[tokio::test]
    async fn test_document_partitions() {
        let store = DocumentStore::temporary().unwrap();
        let admins = AdminRepository::new(store.clone());
        let users = DocUserRepository::new(store);
        admins.create("root@x.com", "$2b$04$a").unwrap();
        users.create("Ada", "a@x.com", "$2b$04$u").unwrap();

        let creds = DocumentCredentials::new(admins, users);
        let admin = creds.find_credential(Partition::Admin, "root@x.com").await.unwrap().unwrap();
        assert!(admin.principal.is_admin());
        assert!(creds.find_credential(Partition::User, "root@x.com").await.unwrap().is_none());
        assert!(creds.find_credential(Partition::Admin, "a@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_relational_admin_flag() {
        let store = SqlStore::in_memory().await.unwrap();
        store.users().create("a@x.com", "ada", "$2b$04$u").await.unwrap();
        store.users().ensure_admin("root@x.com", "root", "$2b$04$a").await.unwrap();

        let creds = RelationalCredentials::new(store.users());
        assert!(creds.find_credential(Partition::Admin, "a@x.com").await.unwrap().is_none());
        let user = creds.find_credential(Partition::User, "a@x.com").await.unwrap().unwrap();
        assert!(!user.principal.is_admin());

        // admins are users too
        let admin = creds.find_credential(Partition::User, "root@x.com").await.unwrap().unwrap();
        assert!(admin.principal.is_admin());
    }
}
