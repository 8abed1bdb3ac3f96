//! Create `payment` table.
//! One row per payment attempt; `transaction_id` is the id sent to the gateway.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(uuid(Payment::Id).primary_key())
                    .col(uuid(Payment::OrderId).not_null())
                    .col(string_len(Payment::Method, 16).not_null())
                    .col(string_len(Payment::Status, 16).not_null())
                    .col(big_integer(Payment::AmountCents).not_null())
                    .col(string_len(Payment::TransactionId, 64).not_null().unique_key())
                    .col(string_len_null(Payment::GatewayValId, 128))
                    .col(timestamp_with_time_zone(Payment::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Payment::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_order")
                            .from(Payment::Table, Payment::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Payment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Payment {
    Table,
    Id,
    OrderId,
    Method,
    Status,
    AmountCents,
    TransactionId,
    GatewayValId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Orders { Table, Id }
