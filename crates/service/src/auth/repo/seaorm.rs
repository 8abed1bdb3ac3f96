use chrono::Utc;
use models::admin_user;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::auth::domain::{AdminUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AdminRepository;

pub struct SeaOrmAdminRepository {
    pub db: DatabaseConnection,
}

fn split(m: admin_user::Model) -> (AdminUser, Credentials) {
    (
        AdminUser { id: m.id, email: m.email, name: m.name },
        Credentials { admin_id: m.id, password_hash: m.password_hash, password_algorithm: m.password_algorithm },
    )
}

#[async_trait::async_trait]
impl AdminRepository for SeaOrmAdminRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<(AdminUser, Credentials)>, AuthError> {
        let res = admin_user::Entity::find()
            .filter(admin_user::Column::Email.eq(email.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(split))
    }

    async fn count_admins(&self) -> Result<u64, AuthError> {
        admin_user::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))
    }

    async fn create_admin(&self, email: &str, name: &str, password_hash: String, password_algorithm: String) -> Result<AdminUser, AuthError> {
        let now = Utc::now().into();
        let created = admin_user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            name: Set(name.to_string()),
            password_hash: Set(password_hash),
            password_algorithm: Set(password_algorithm),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => AuthError::Conflict,
            _ => AuthError::Repository(e.to_string()),
        })?;
        Ok(split(created).0)
    }
}
