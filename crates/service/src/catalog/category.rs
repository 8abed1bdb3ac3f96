use chrono::Utc;
use models::{category, validation};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::catalog::tombstone_slug;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    /// Derived from `name` when omitted.
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

/// Non-deleted categories in navigation order.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>, ServiceError> {
    Ok(category::Entity::find()
        .filter(category::Column::DeletedAt.is_null())
        .order_by_asc(category::Column::SortOrder)
        .order_by_asc(category::Column::Name)
        .all(db)
        .await?)
}

pub async fn get_category(db: &DatabaseConnection, id: Uuid) -> Result<Option<category::Model>, ServiceError> {
    Ok(category::Entity::find_by_id(id)
        .filter(category::Column::DeletedAt.is_null())
        .one(db)
        .await?)
}

#[instrument(skip(db, input), fields(id = ?input.id, name = %input.name))]
pub async fn upsert_category(db: &DatabaseConnection, input: CategoryInput) -> Result<category::Model, ServiceError> {
    let name = validation::validate_name("name", &input.name)?;
    let slug = validation::resolve_slug(input.slug.as_deref(), &name)?;
    let image_url = validation::non_blank(input.image_url);
    if let Some(url) = &image_url {
        validation::validate_url("image_url", url)?;
    }
    let description = validation::non_blank(input.description);
    let now = Utc::now().into();

    let saved = match input.id {
        None => {
            category::ActiveModel {
                id: Set(Uuid::new_v4()),
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
            let mut am: category::ActiveModel = get_category(db, id)
                .await?
                .ok_or_else(|| ServiceError::not_found("category"))?
                .into();
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
    info!(id = %saved.id, slug = %saved.slug, "category_saved");
    Ok(saved)
}

/// Soft delete; returns false when the category does not exist or is already deleted.
pub async fn delete_category(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let Some(found) = get_category(db, id).await? else { return Ok(false) };
    let slug = tombstone_slug(&found.slug, found.id);
    let mut am: category::ActiveModel = found.into();
    am.slug = Set(slug);
    am.deleted_at = Set(Some(Utc::now().into()));
    am.update(db).await?;
    info!(id = %id, "category_soft_deleted");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn category_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let c = upsert_category(&db, CategoryInput { name: "Home Services".into(), ..Default::default() }).await?;
        assert_eq!(c.slug, "home-services");

        let updated = upsert_category(&db, CategoryInput { id: Some(c.id), name: "Home Care".into(), slug: Some("home-care".into()), sort_order: Some(3), ..Default::default() }).await?;
        assert_eq!(updated.slug, "home-care");
        assert_eq!(updated.sort_order, 3);

        assert!(delete_category(&db, c.id).await?);
        assert!(get_category(&db, c.id).await?.is_none());
        assert!(list_categories(&db).await?.is_empty());
        assert!(!delete_category(&db, c.id).await?);

        // the slug is free again after a soft delete
        let again = upsert_category(&db, CategoryInput { name: "Home Care".into(), ..Default::default() }).await?;
        assert_eq!(again.slug, "home-care");
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_slug_is_conflict() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        upsert_category(&db, CategoryInput { name: "Electronics".into(), ..Default::default() }).await?;
        let err = upsert_category(&db, CategoryInput { name: "Electronics".into(), ..Default::default() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)), "got {err:?}");
        Ok(())
    }
}
