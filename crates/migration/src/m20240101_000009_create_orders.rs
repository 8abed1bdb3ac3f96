//! Create `orders` table (`order` is reserved in SQL).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(uuid(Orders::Id).primary_key())
                    .col(string_len(Orders::OrderNumber, 32).not_null().unique_key())
                    .col(string_len(Orders::CustomerName, 120).not_null())
                    .col(string_len_null(Orders::CustomerEmail, 255))
                    .col(string_len(Orders::CustomerPhone, 32).not_null())
                    .col(text(Orders::ShippingAddress).not_null())
                    .col(text_null(Orders::Note))
                    .col(string_len(Orders::Status, 16).not_null())
                    .col(string_len(Orders::PaymentMethod, 16).not_null())
                    .col(big_integer(Orders::TotalCents).not_null())
                    .col(timestamp_with_time_zone(Orders::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Orders::UpdatedAt).not_null())
                    .col(timestamp_with_time_zone_null(Orders::DeletedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Orders::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    OrderNumber,
    CustomerName,
    CustomerEmail,
    CustomerPhone,
    ShippingAddress,
    Note,
    Status,
    PaymentMethod,
    TotalCents,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
