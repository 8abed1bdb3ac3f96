//! Create `product` table.
//! Prices are integer minor units; `description` holds editor HTML as-is.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(uuid(Product::Id).primary_key())
                    .col(uuid_null(Product::CategoryId))
                    .col(string_len(Product::Name, 200).not_null())
                    .col(string_len(Product::Slug, 120).not_null().unique_key())
                    .col(text_null(Product::Description))
                    .col(big_integer(Product::PriceCents).not_null())
                    .col(integer(Product::Stock).not_null())
                    .col(string_len_null(Product::ImageUrl, 1024))
                    .col(boolean(Product::IsActive).not_null())
                    .col(timestamp_with_time_zone(Product::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Product::UpdatedAt).not_null())
                    .col(timestamp_with_time_zone_null(Product::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_category")
                            .from(Product::Table, Product::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    CategoryId,
    Name,
    Slug,
    Description,
    PriceCents,
    Stock,
    ImageUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Category { Table, Id }
