//! Bookable services listed under a subcategory (table `service`).
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::subcategory;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub subcategory_id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Subcategory }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Subcategory => Entity::belongs_to(subcategory::Entity)
                .from(Column::SubcategoryId)
                .to(subcategory::Column::Id)
                .into(),
        }
    }
}

impl Related<subcategory::Entity> for Entity {
    fn to() -> RelationDef { Relation::Subcategory.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_live(&self) -> bool { self.is_active && self.deleted_at.is_none() }
}
