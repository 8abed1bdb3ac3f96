//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_admin_user;
mod m20240101_000002_create_banner;
mod m20240101_000003_create_category;
mod m20240101_000004_create_subcategory;
mod m20240101_000005_create_carousel_image;
mod m20240101_000006_create_product;
mod m20240101_000007_create_service;
mod m20240101_000008_create_homepage_section;
mod m20240101_000009_create_orders;
mod m20240101_000010_create_order_item;
mod m20240101_000011_create_payment;
mod m20240101_000020_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_admin_user::Migration),
            Box::new(m20240101_000002_create_banner::Migration),
            Box::new(m20240101_000003_create_category::Migration),
            Box::new(m20240101_000004_create_subcategory::Migration),
            Box::new(m20240101_000005_create_carousel_image::Migration),
            Box::new(m20240101_000006_create_product::Migration),
            Box::new(m20240101_000007_create_service::Migration),
            Box::new(m20240101_000008_create_homepage_section::Migration),
            Box::new(m20240101_000009_create_orders::Migration),
            Box::new(m20240101_000010_create_order_item::Migration),
            Box::new(m20240101_000011_create_payment::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000020_add_indexes::Migration),
        ]
    }
}
