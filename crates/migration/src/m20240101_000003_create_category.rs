//! Create `category` table.
//! Top level of the catalogue tree; slugs are globally unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(uuid(Category::Id).primary_key())
                    .col(string_len(Category::Name, 120).not_null())
                    .col(string_len(Category::Slug, 120).not_null().unique_key())
                    .col(text_null(Category::Description))
                    .col(string_len_null(Category::ImageUrl, 1024))
                    .col(integer(Category::SortOrder).not_null())
                    .col(boolean(Category::IsActive).not_null())
                    .col(timestamp_with_time_zone(Category::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Category::UpdatedAt).not_null())
                    .col(timestamp_with_time_zone_null(Category::DeletedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Category::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Category {
    Table,
    Id,
    Name,
    Slug,
    Description,
    ImageUrl,
    SortOrder,
    IsActive,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
