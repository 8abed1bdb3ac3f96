use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{order_item, payment};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: String,
    pub shipping_address: String,
    pub note: Option<String>,
    /// See [`crate::status::OrderStatus`].
    pub status: String,
    /// See [`crate::status::PaymentMethod`].
    pub payment_method: String,
    pub total_cents: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Items, Payments }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Items => Entity::has_many(order_item::Entity).into(),
            Relation::Payments => Entity::has_many(payment::Entity).into(),
        }
    }
}

impl Related<order_item::Entity> for Entity {
    fn to() -> RelationDef { Relation::Items.def() }
}

impl Related<payment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Payments.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// `ORD-YYYYMMDD-XXXXXX`, suffix taken from the order id.
pub fn order_number(id: Uuid, at: chrono::DateTime<chrono::Utc>) -> String {
    let simple = id.simple().to_string().to_ascii_uppercase();
    format!("ORD-{}-{}", at.format("%Y%m%d"), &simple[..6])
}
