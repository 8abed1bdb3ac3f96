use chrono::Utc;
use models::{subcategory, validation};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::catalog::{category, tombstone_slug};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubcategoryInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub category_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Non-deleted subcategories, optionally limited to one category.
pub async fn list_subcategories(db: &DatabaseConnection, category_id: Option<Uuid>) -> Result<Vec<subcategory::Model>, ServiceError> {
    let mut finder = subcategory::Entity::find().filter(subcategory::Column::DeletedAt.is_null());
    if let Some(cid) = category_id {
        finder = finder.filter(subcategory::Column::CategoryId.eq(cid));
    }
    Ok(finder
        .order_by_asc(subcategory::Column::SortOrder)
        .order_by_asc(subcategory::Column::Name)
        .all(db)
        .await?)
}

pub async fn get_subcategory(db: &DatabaseConnection, id: Uuid) -> Result<Option<subcategory::Model>, ServiceError> {
    Ok(subcategory::Entity::find_by_id(id)
        .filter(subcategory::Column::DeletedAt.is_null())
        .one(db)
        .await?)
}

#[instrument(skip(db, input), fields(id = ?input.id, category_id = %input.category_id))]
pub async fn upsert_subcategory(db: &DatabaseConnection, input: SubcategoryInput) -> Result<subcategory::Model, ServiceError> {
    let name = validation::validate_name("name", &input.name)?;
    let slug = validation::resolve_slug(input.slug.as_deref(), &name)?;
    let image_url = validation::non_blank(input.image_url);
    if let Some(url) = &image_url {
        validation::validate_url("image_url", url)?;
    }
    if category::get_category(db, input.category_id).await?.is_none() {
        return Err(ServiceError::Validation("category does not exist".into()));
    }
    let description = validation::non_blank(input.description);
    let now = Utc::now().into();

    let saved = match input.id {
        None => {
            subcategory::ActiveModel {
                id: Set(Uuid::new_v4()),
                category_id: Set(input.category_id),
                name: Set(name),
                slug: Set(slug),
                description: Set(description),
                image_url: Set(image_url),
                sort_order: Set(input.sort_order.unwrap_or(0)),
                is_active: Set(input.is_active.unwrap_or(true)),
                created_at: Set(now),
                updated_at: Set(now),
                deleted_at: Set(None),
            }
            .insert(db)
            .await?
        }
        Some(id) => {
            let mut am: subcategory::ActiveModel = get_subcategory(db, id)
                .await?
                .ok_or_else(|| ServiceError::not_found("subcategory"))?
                .into();
            am.category_id = Set(input.category_id);
            am.name = Set(name);
            am.slug = Set(slug);
            am.description = Set(description);
            am.image_url = Set(image_url);
            if let Some(o) = input.sort_order { am.sort_order = Set(o); }
            if let Some(a) = input.is_active { am.is_active = Set(a); }
            am.updated_at = Set(now);
            am.update(db).await?
        }
    };
    info!(id = %saved.id, slug = %saved.slug, "subcategory_saved");
    Ok(saved)
}

pub async fn delete_subcategory(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let Some(found) = get_subcategory(db, id).await? else { return Ok(false) };
    let slug = tombstone_slug(&found.slug, found.id);
    let mut am: subcategory::ActiveModel = found.into();
    am.slug = Set(slug);
    am.deleted_at = Set(Some(Utc::now().into()));
    am.update(db).await?;
    info!(id = %id, "subcategory_soft_deleted");
    Ok(true)
}
