use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Subcategory: lookup by parent category
        manager
            .create_index(
                Index::create()
                    .name("idx_subcategory_category")
                    .table(Subcategory::Table)
                    .col(Subcategory::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Carousel: slot reads are (subcategory, position) ordered by sort_order
        manager
            .create_index(
                Index::create()
                    .name("idx_carousel_slot")
                    .table(CarouselImage::Table)
                    .col(CarouselImage::SubcategoryId)
                    .col(CarouselImage::Position)
                    .col(CarouselImage::SortOrder)
                    .to_owned(),
            )
            .await?;

        // Service: lookup by subcategory
        manager
            .create_index(
                Index::create()
                    .name("idx_service_subcategory")
                    .table(Service::Table)
                    .col(Service::SubcategoryId)
                    .to_owned(),
            )
            .await?;

        // OrderItem / Payment: lookup by order
        manager
            .create_index(
                Index::create()
                    .name("idx_order_item_order")
                    .table(OrderItem::Table)
                    .col(OrderItem::OrderId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_payment_order")
                    .table(Payment::Table)
                    .col(Payment::OrderId)
                    .to_owned(),
            )
            .await?;

        // Orders: admin list filters by status, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_orders_status_created")
                    .table(Orders::Table)
                    .col(Orders::Status)
                    .col(Orders::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_subcategory_category").table(Subcategory::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_carousel_slot").table(CarouselImage::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_subcategory").table(Service::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_item_order").table(OrderItem::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_payment_order").table(Payment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_orders_status_created").table(Orders::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Subcategory { Table, CategoryId }

#[derive(DeriveIden)]
enum CarouselImage { Table, SubcategoryId, Position, SortOrder }

#[derive(DeriveIden)]
enum Service { Table, SubcategoryId }

#[derive(DeriveIden)]
enum OrderItem { Table, OrderId }

#[derive(DeriveIden)]
enum Payment { Table, OrderId }

#[derive(DeriveIden)]
enum Orders { Table, Status, CreatedAt }
