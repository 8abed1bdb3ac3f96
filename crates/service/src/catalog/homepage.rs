use std::collections::HashSet;

use chrono::Utc;
use models::{catalog_service, homepage_section, homepage_section_service, validation};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::catalog::subcategory;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Deserialize)]
pub struct SectionInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub subcategory_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Display order of the section; replaces the current membership.
    #[serde(default)]
    pub service_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionDetail {
    #[serde(flatten)]
    pub section: homepage_section::Model,
    pub service_ids: Vec<Uuid>,
}

pub async fn list_sections(db: &DatabaseConnection) -> Result<Vec<homepage_section::Model>, ServiceError> {
    Ok(homepage_section::Entity::find()
        .order_by_asc(homepage_section::Column::SortOrder)
        .order_by_asc(homepage_section::Column::CreatedAt)
        .all(db)
        .await?)
}

async fn member_ids<C: sea_orm::ConnectionTrait>(conn: &C, section_id: Uuid) -> Result<Vec<Uuid>, ServiceError> {
    Ok(homepage_section_service::Entity::find()
        .select_only()
        .column(homepage_section_service::Column::ServiceId)
        .filter(homepage_section_service::Column::SectionId.eq(section_id))
        .order_by_asc(homepage_section_service::Column::SortOrder)
        .into_tuple::<Uuid>()
        .all(conn)
        .await?)
}

pub async fn get_section(db: &DatabaseConnection, id: Uuid) -> Result<Option<SectionDetail>, ServiceError> {
    let Some(section) = homepage_section::Entity::find_by_id(id).one(db).await? else { return Ok(None) };
    let service_ids = member_ids(db, id).await?;
    Ok(Some(SectionDetail { section, service_ids }))
}

/// Saves the section and replaces its service list in one transaction.
#[instrument(skip(db, input), fields(id = ?input.id, subcategory_id = %input.subcategory_id, services = input.service_ids.len()))]
pub async fn upsert_section(db: &DatabaseConnection, input: SectionInput) -> Result<SectionDetail, ServiceError> {
    let title = validation::validate_name("title", &input.title)?;
    let unique: HashSet<Uuid> = input.service_ids.iter().copied().collect();
    if unique.len() != input.service_ids.len() {
        return Err(ServiceError::Validation("service_ids contains duplicates".into()));
    }
    if subcategory::get_subcategory(db, input.subcategory_id).await?.is_none() {
        return Err(ServiceError::Validation("subcategory does not exist".into()));
    }

    let txn = db.begin().await?;
    if !unique.is_empty() {
        let matching = catalog_service::Entity::find()
            .filter(catalog_service::Column::Id.is_in(unique.iter().copied()))
            .filter(catalog_service::Column::SubcategoryId.eq(input.subcategory_id))
            .filter(catalog_service::Column::DeletedAt.is_null())
            .count(&txn)
            .await?;
        if matching != unique.len() as u64 {
            return Err(ServiceError::Validation("every service must belong to the section's subcategory".into()));
        }
    }

    let now = Utc::now().into();
    let section = match input.id {
        None => {
            homepage_section::ActiveModel {
                id: Set(Uuid::new_v4()),
                subcategory_id: Set(input.subcategory_id),
                title: Set(title),
                sort_order: Set(input.sort_order.unwrap_or(0)),
                is_active: Set(input.is_active.unwrap_or(true)),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await?
        }
        Some(id) => {
            let mut am: homepage_section::ActiveModel = homepage_section::Entity::find_by_id(id)
                .one(&txn)
                .await?
                .ok_or_else(|| ServiceError::not_found("homepage section"))?
                .into();
            am.subcategory_id = Set(input.subcategory_id);
            am.title = Set(title);
            if let Some(o) = input.sort_order { am.sort_order = Set(o); }
            if let Some(a) = input.is_active { am.is_active = Set(a); }
            am.updated_at = Set(now);
            am.update(&txn).await?
        }
    };

    homepage_section_service::Entity::delete_many()
        .filter(homepage_section_service::Column::SectionId.eq(section.id))
        .exec(&txn)
        .await?;
    if !input.service_ids.is_empty() {
        let rows = input.service_ids.iter().enumerate().map(|(idx, sid)| homepage_section_service::ActiveModel {
            section_id: Set(section.id),
            service_id: Set(*sid),
            sort_order: Set(idx as i32),
        });
        homepage_section_service::Entity::insert_many(rows).exec(&txn).await?;
    }
    txn.commit().await?;

    info!(id = %section.id, services = input.service_ids.len(), "homepage_section_saved");
    Ok(SectionDetail { section, service_ids: input.service_ids })
}

/// Memberships go with the section through the cascading foreign key.
pub async fn delete_section(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let res = homepage_section::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected > 0 {
        info!(id = %id, "homepage_section_deleted");
    }
    Ok(res.rows_affected > 0)
}
