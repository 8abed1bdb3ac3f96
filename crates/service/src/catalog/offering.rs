//! Bookable services (the `service` table). Named `offering` to keep clear of the crate name.

use chrono::Utc;
use models::{catalog_service, homepage_section_service, validation};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::catalog::{subcategory, tombstone_slug};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub subcategory_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

pub async fn list_services(db: &DatabaseConnection, subcategory_id: Option<Uuid>) -> Result<Vec<catalog_service::Model>, ServiceError> {
    let mut finder = catalog_service::Entity::find().filter(catalog_service::Column::DeletedAt.is_null());
    if let Some(sid) = subcategory_id {
        finder = finder.filter(catalog_service::Column::SubcategoryId.eq(sid));
    }
    Ok(finder.order_by_asc(catalog_service::Column::Name).all(db).await?)
}

pub async fn get_service(db: &DatabaseConnection, id: Uuid) -> Result<Option<catalog_service::Model>, ServiceError> {
    Ok(catalog_service::Entity::find_by_id(id)
        .filter(catalog_service::Column::DeletedAt.is_null())
        .one(db)
        .await?)
}

#[instrument(skip(db, input), fields(id = ?input.id, subcategory_id = %input.subcategory_id))]
pub async fn upsert_service(db: &DatabaseConnection, input: ServiceInput) -> Result<catalog_service::Model, ServiceError> {
    let name = validation::validate_name("name", &input.name)?;
    let slug = validation::resolve_slug(input.slug.as_deref(), &name)?;
    validation::validate_price(input.price_cents)?;
    let image_url = validation::non_blank(input.image_url);
    if let Some(url) = &image_url {
        validation::validate_url("image_url", url)?;
    }
    if subcategory::get_subcategory(db, input.subcategory_id).await?.is_none() {
        return Err(ServiceError::Validation("subcategory does not exist".into()));
    }
    let description = validation::non_blank(input.description);
    let now = Utc::now().into();

    let saved = match input.id {
        None => {
            catalog_service::ActiveModel {
                id: Set(Uuid::new_v4()),
                subcategory_id: Set(input.subcategory_id),
                name: Set(name),
                slug: Set(slug),
                description: Set(description),
                price_cents: Set(input.price_cents),
                image_url: Set(image_url),
                is_active: Set(input.is_active.unwrap_or(true)),
                created_at: Set(now),
                updated_at: Set(now),
                deleted_at: Set(None),
            }
            .insert(db)
            .await?
        }
        Some(id) => {
            let existing = get_service(db, id).await?.ok_or_else(|| ServiceError::not_found("service"))?;
            let moved = existing.subcategory_id != input.subcategory_id;
            let txn = db.begin().await?;
            let mut am: catalog_service::ActiveModel = existing.into();
            am.subcategory_id = Set(input.subcategory_id);
            am.name = Set(name);
            am.slug = Set(slug);
            am.description = Set(description);
            am.price_cents = Set(input.price_cents);
            am.image_url = Set(image_url);
            if let Some(a) = input.is_active { am.is_active = Set(a); }
            am.updated_at = Set(now);
            let saved = am.update(&txn).await?;
            // Sections only list services of their own subcategory.
            if moved {
                homepage_section_service::Entity::delete_many()
                    .filter(homepage_section_service::Column::ServiceId.eq(id))
                    .exec(&txn)
                    .await?;
            }
            txn.commit().await?;
            saved
        }
    };
    info!(id = %saved.id, slug = %saved.slug, "service_saved");
    Ok(saved)
}

/// Soft delete that also drops the service from every homepage section.
pub async fn delete_service(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let Some(found) = get_service(db, id).await? else { return Ok(false) };
    let slug = tombstone_slug(&found.slug, found.id);
    let txn = db.begin().await?;
    let mut am: catalog_service::ActiveModel = found.into();
    am.slug = Set(slug);
    am.deleted_at = Set(Some(Utc::now().into()));
    am.update(&txn).await?;
    let detached = homepage_section_service::Entity::delete_many()
        .filter(homepage_section_service::Column::ServiceId.eq(id))
        .exec(&txn)
        .await?;
    txn.commit().await?;
    info!(id = %id, sections = detached.rows_affected, "service_soft_deleted");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::homepage::{self, SectionInput};
    use crate::test_support::{get_db, seed_category, seed_service, seed_subcategory};

    #[tokio::test]
    async fn list_filters_by_subcategory() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let cat = seed_category(&db, "Home").await?;
        let a = seed_subcategory(&db, cat.id, "Cleaning").await?;
        let b = seed_subcategory(&db, cat.id, "Plumbing").await?;
        seed_service(&db, a.id, "Deep Clean", 5_000).await?;
        seed_service(&db, a.id, "Basic Clean", 2_000).await?;
        seed_service(&db, b.id, "Leak Fix", 3_000).await?;

        let only_a = list_services(&db, Some(a.id)).await?;
        assert_eq!(only_a.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(), vec!["Basic Clean", "Deep Clean"]);
        assert_eq!(list_services(&db, None).await?.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn delete_detaches_from_sections() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let cat = seed_category(&db, "Home").await?;
        let sub = seed_subcategory(&db, cat.id, "Cleaning").await?;
        let keep = seed_service(&db, sub.id, "Deep Clean", 5_000).await?;
        let gone = seed_service(&db, sub.id, "Basic Clean", 2_000).await?;
        let section = homepage::upsert_section(&db, SectionInput {
            id: None,
            subcategory_id: sub.id,
            title: "Popular".into(),
            sort_order: None,
            is_active: None,
            service_ids: vec![gone.id, keep.id],
        })
        .await?;

        assert!(delete_service(&db, gone.id).await?);
        let detail = homepage::get_section(&db, section.section.id).await?.expect("section");
        assert_eq!(detail.service_ids, vec![keep.id]);
        Ok(())
    }
}
