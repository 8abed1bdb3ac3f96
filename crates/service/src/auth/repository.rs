use async_trait::async_trait;

use super::domain::{AdminUser, Credentials};
use super::errors::AuthError;

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<(AdminUser, Credentials)>, AuthError>;
    async fn count_admins(&self) -> Result<u64, AuthError>;
    async fn create_admin(&self, email: &str, name: &str, password_hash: String, password_algorithm: String) -> Result<AdminUser, AuthError>;
}

/// In-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    pub struct MockAdminRepository {
        admins: Mutex<HashMap<String, (AdminUser, Credentials)>>, // key: email
    }

    impl MockAdminRepository {
        fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, (AdminUser, Credentials)>>, AuthError> {
            self.admins.lock().map_err(|e| AuthError::Repository(e.to_string()))
        }
    }

    #[async_trait]
    impl AdminRepository for MockAdminRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<(AdminUser, Credentials)>, AuthError> {
            Ok(self.lock()?.get(email).cloned())
        }

        async fn count_admins(&self) -> Result<u64, AuthError> {
            Ok(self.lock()?.len() as u64)
        }

        async fn create_admin(&self, email: &str, name: &str, password_hash: String, password_algorithm: String) -> Result<AdminUser, AuthError> {
            let mut admins = self.lock()?;
            if admins.contains_key(email) {
                return Err(AuthError::Conflict);
            }
            let admin = AdminUser { id: Uuid::new_v4(), email: email.to_string(), name: name.to_string() };
            let cred = Credentials { admin_id: admin.id, password_hash, password_algorithm };
            admins.insert(email.to_string(), (admin.clone(), cred));
            Ok(admin)
        }
    }
}
