//! Create `homepage_section` and its ordered service membership table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HomepageSection::Table)
                    .if_not_exists()
                    .col(uuid(HomepageSection::Id).primary_key())
                    .col(uuid(HomepageSection::SubcategoryId).not_null())
                    .col(string_len(HomepageSection::Title, 200).not_null())
                    .col(integer(HomepageSection::SortOrder).not_null())
                    .col(boolean(HomepageSection::IsActive).not_null())
                    .col(timestamp_with_time_zone(HomepageSection::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(HomepageSection::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_homepage_section_subcategory")
                            .from(HomepageSection::Table, HomepageSection::SubcategoryId)
                            .to(Subcategory::Table, Subcategory::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HomepageSectionService::Table)
                    .if_not_exists()
                    .col(uuid(HomepageSectionService::SectionId).not_null())
                    .col(uuid(HomepageSectionService::ServiceId).not_null())
                    .col(integer(HomepageSectionService::SortOrder).not_null())
                    .primary_key(
                        Index::create()
                            .col(HomepageSectionService::SectionId)
                            .col(HomepageSectionService::ServiceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_section_service_section")
                            .from(HomepageSectionService::Table, HomepageSectionService::SectionId)
                            .to(HomepageSection::Table, HomepageSection::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_section_service_service")
                            .from(HomepageSectionService::Table, HomepageSectionService::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(HomepageSectionService::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(HomepageSection::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum HomepageSection {
    Table,
    Id,
    SubcategoryId,
    Title,
    SortOrder,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum HomepageSectionService {
    Table,
    SectionId,
    ServiceId,
    SortOrder,
}

#[derive(DeriveIden)]
enum Subcategory { Table, Id }

#[derive(DeriveIden)]
enum Service { Table, Id }
