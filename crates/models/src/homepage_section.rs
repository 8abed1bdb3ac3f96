use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{homepage_section_service, subcategory};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "homepage_section")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub subcategory_id: Uuid,
    pub title: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Subcategory, Services }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Subcategory => Entity::belongs_to(subcategory::Entity)
                .from(Column::SubcategoryId)
                .to(subcategory::Column::Id)
                .into(),
            Relation::Services => Entity::has_many(homepage_section_service::Entity).into(),
        }
    }
}

impl Related<subcategory::Entity> for Entity {
    fn to() -> RelationDef { Relation::Subcategory.def() }
}

impl ActiveModelBehavior for ActiveModel {}
