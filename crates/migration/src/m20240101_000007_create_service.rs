//! Create `service` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Service::Table)
                    .if_not_exists()
                    .col(uuid(Service::Id).primary_key())
                    .col(uuid(Service::SubcategoryId).not_null())
                    .col(string_len(Service::Name, 200).not_null())
                    .col(string_len(Service::Slug, 120).not_null().unique_key())
                    .col(text_null(Service::Description))
                    .col(big_integer(Service::PriceCents).not_null())
                    .col(string_len_null(Service::ImageUrl, 1024))
                    .col(boolean(Service::IsActive).not_null())
                    .col(timestamp_with_time_zone(Service::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Service::UpdatedAt).not_null())
                    .col(timestamp_with_time_zone_null(Service::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_subcategory")
                            .from(Service::Table, Service::SubcategoryId)
                            .to(Subcategory::Table, Subcategory::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Service::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Service {
    Table,
    Id,
    SubcategoryId,
    Name,
    Slug,
    Description,
    PriceCents,
    ImageUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Subcategory { Table, Id }
