use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::subcategory;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carousel_image")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub subcategory_id: Uuid,
    /// One of `left`, `middle`, `right`; see [`crate::status::CarouselPosition`].
    pub position: String,
    pub image_url: String,
    pub sort_order: i32,
    pub created_at: DateTimeWithTimeZone,
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
