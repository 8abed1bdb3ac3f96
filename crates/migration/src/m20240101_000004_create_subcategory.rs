//! Create `subcategory` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subcategory::Table)
                    .if_not_exists()
                    .col(uuid(Subcategory::Id).primary_key())
                    .col(uuid(Subcategory::CategoryId).not_null())
                    .col(string_len(Subcategory::Name, 120).not_null())
                    .col(string_len(Subcategory::Slug, 120).not_null().unique_key())
                    .col(text_null(Subcategory::Description))
                    .col(string_len_null(Subcategory::ImageUrl, 1024))
                    .col(integer(Subcategory::SortOrder).not_null())
                    .col(boolean(Subcategory::IsActive).not_null())
                    .col(timestamp_with_time_zone(Subcategory::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Subcategory::UpdatedAt).not_null())
                    .col(timestamp_with_time_zone_null(Subcategory::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subcategory_category")
                            .from(Subcategory::Table, Subcategory::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Subcategory::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Subcategory {
    Table,
    Id,
    CategoryId,
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

#[derive(DeriveIden)]
enum Category { Table, Id }
