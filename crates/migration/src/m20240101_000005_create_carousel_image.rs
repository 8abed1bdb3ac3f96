//! Create `carousel_image` table.
//! Each row sits in one of the left/middle/right slots of a subcategory page.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CarouselImage::Table)
                    .if_not_exists()
                    .col(uuid(CarouselImage::Id).primary_key())
                    .col(uuid(CarouselImage::SubcategoryId).not_null())
                    .col(string_len(CarouselImage::Position, 16).not_null())
                    .col(string_len(CarouselImage::ImageUrl, 1024).not_null())
                    .col(integer(CarouselImage::SortOrder).not_null())
                    .col(timestamp_with_time_zone(CarouselImage::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_carousel_image_subcategory")
                            .from(CarouselImage::Table, CarouselImage::SubcategoryId)
                            .to(Subcategory::Table, Subcategory::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(CarouselImage::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum CarouselImage {
    Table,
    Id,
    SubcategoryId,
    Position,
    ImageUrl,
    SortOrder,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Subcategory { Table, Id }
