use std::sync::Arc;

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("payment gateway error: {0}")]
    Gateway(String),
    #[error("media storage error: {0}")]
    Media(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => ServiceError::Conflict(format!("duplicate value: {msg}")),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => ServiceError::Validation(format!("referenced row missing: {msg}")),
            _ => ServiceError::Db(e.to_string()),
        }
    }
}

/// Loader errors come back from the cache shared behind an `Arc`.
impl From<Arc<ServiceError>> for ServiceError {
    fn from(e: Arc<ServiceError>) -> Self { Arc::unwrap_or_clone(e) }
}
