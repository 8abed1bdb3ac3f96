use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{product, subcategory};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Subcategory, Product }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Subcategory => Entity::has_many(subcategory::Entity).into(),
            Relation::Product => Entity::has_many(product::Entity).into(),
        }
    }
}

impl Related<subcategory::Entity> for Entity {
    fn to() -> RelationDef { Relation::Subcategory.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Visible on the storefront.
    pub fn is_live(&self) -> bool { self.is_active && self.deleted_at.is_none() }
}
