#![cfg(test)]
use sea_orm::DatabaseConnection;
use migration::MigratorTrait;
use models::db::connect_in_memory;
use uuid::Uuid;

use crate::catalog::{category, subcategory, offering, product};

/// Fresh migrated in-memory database per test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

pub async fn seed_category(db: &DatabaseConnection, name: &str) -> anyhow::Result<models::category::Model> {
    Ok(category::upsert_category(db, category::CategoryInput { name: name.into(), ..Default::default() }).await?)
}

pub async fn seed_subcategory(db: &DatabaseConnection, category_id: Uuid, name: &str) -> anyhow::Result<models::subcategory::Model> {
    Ok(subcategory::upsert_subcategory(db, subcategory::SubcategoryInput { category_id, name: name.into(), ..Default::default() }).await?)
}

pub async fn seed_service(db: &DatabaseConnection, subcategory_id: Uuid, name: &str, price_cents: i64) -> anyhow::Result<models::catalog_service::Model> {
    Ok(offering::upsert_service(db, offering::ServiceInput { subcategory_id, name: name.into(), price_cents, ..Default::default() }).await?)
}

pub async fn seed_product(db: &DatabaseConnection, name: &str, price_cents: i64, stock: i32) -> anyhow::Result<models::product::Model> {
    Ok(product::upsert_product(db, product::ProductInput { name: name.into(), price_cents, stock: Some(stock), ..Default::default() }).await?)
}
