use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{catalog_service, homepage_section};

/// Ordered membership of a service in a homepage section.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "homepage_section_service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub section_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub service_id: Uuid,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Section, Service }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Section => Entity::belongs_to(homepage_section::Entity)
                .from(Column::SectionId)
                .to(homepage_section::Column::Id)
                .into(),
            Relation::Service => Entity::belongs_to(catalog_service::Entity)
                .from(Column::ServiceId)
                .to(catalog_service::Column::Id)
                .into(),
        }
    }
}

impl Related<homepage_section::Entity> for Entity {
    fn to() -> RelationDef { Relation::Section.def() }
}

impl Related<catalog_service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl ActiveModelBehavior for ActiveModel {}
