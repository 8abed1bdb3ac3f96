use chrono::Utc;
use common::pagination::Pagination;
use common::types::Page;
use models::{product, validation};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::catalog::{category, tombstone_slug};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    /// HTML from the dashboard editor.
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: i64,
    /// Absent on an edit keeps the current stock.
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Newest first. `search` matches name or slug, ignoring case.
pub async fn list_products(
    db: &DatabaseConnection,
    pagination: Pagination,
    search: Option<&str>,
) -> Result<Page<product::Model>, ServiceError> {
    let (page_idx, page_size) = pagination.normalize();
    let (page, per_page) = pagination.clamped();
    let mut finder = product::Entity::find().filter(product::Column::DeletedAt.is_null());
    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", term.to_lowercase());
        finder = finder.filter(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col((product::Entity, product::Column::Name)))).like(pattern.clone()))
                .add(Expr::expr(Func::lower(Expr::col((product::Entity, product::Column::Slug)))).like(pattern)),
        );
    }
    let paginator = finder
        .order_by_desc(product::Column::CreatedAt)
        .order_by_asc(product::Column::Id)
        .paginate(db, page_size);
    let counts = paginator.num_items_and_pages().await?;
    let items = paginator.fetch_page(page_idx).await?;
    Ok(Page {
        items,
        page,
        per_page,
        total_items: counts.number_of_items,
        total_pages: counts.number_of_pages,
    })
}

pub async fn get_product(db: &DatabaseConnection, id: Uuid) -> Result<Option<product::Model>, ServiceError> {
    Ok(product::Entity::find_by_id(id)
        .filter(product::Column::DeletedAt.is_null())
        .one(db)
        .await?)
}

#[instrument(skip(db, input), fields(id = ?input.id, name = %input.name))]
pub async fn upsert_product(db: &DatabaseConnection, input: ProductInput) -> Result<product::Model, ServiceError> {
    let name = validation::validate_name("name", &input.name)?;
    let slug = validation::resolve_slug(input.slug.as_deref(), &name)?;
    validation::validate_price(input.price_cents)?;
    if let Some(stock) = input.stock {
        validation::validate_stock(stock)?;
    }
    let image_url = validation::non_blank(input.image_url);
    if let Some(url) = &image_url {
        validation::validate_url("image_url", url)?;
    }
    if let Some(cid) = input.category_id {
        if category::get_category(db, cid).await?.is_none() {
            return Err(ServiceError::Validation("category does not exist".into()));
        }
    }
    let description = validation::non_blank(input.description);
    let now = Utc::now().into();

    let saved = match input.id {
        None => {
            product::ActiveModel {
                id: Set(Uuid::new_v4()),
                category_id: Set(input.category_id),
                name: Set(name),
                slug: Set(slug),
                description: Set(description),
                price_cents: Set(input.price_cents),
                stock: Set(input.stock.unwrap_or(0)),
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
            let mut am: product::ActiveModel = get_product(db, id)
                .await?
                .ok_or_else(|| ServiceError::not_found("product"))?
                .into();
            am.category_id = Set(input.category_id);
            am.name = Set(name);
            am.slug = Set(slug);
            am.description = Set(description);
            am.price_cents = Set(input.price_cents);
            if let Some(stock) = input.stock { am.stock = Set(stock); }
            am.image_url = Set(image_url);
            if let Some(a) = input.is_active { am.is_active = Set(a); }
            am.updated_at = Set(now);
            am.update(db).await?
        }
    };
    info!(id = %saved.id, slug = %saved.slug, "product_saved");
    Ok(saved)
}

pub async fn delete_product(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let Some(found) = get_product(db, id).await? else { return Ok(false) };
    let slug = tombstone_slug(&found.slug, found.id);
    let mut am: product::ActiveModel = found.into();
    am.slug = Set(slug);
    am.deleted_at = Set(Some(Utc::now().into()));
    am.update(db).await?;
    info!(id = %id, "product_soft_deleted");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_product};
    use models::errors::ModelError;

    #[tokio::test]
    async fn list_paginates_and_searches() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        for n in 0..5 {
            seed_product(&db, &format!("Widget {n}"), 1_000, 3).await?;
        }
        seed_product(&db, "Gadget", 2_500, 1).await?;

        let first = list_products(&db, Pagination { page: 1, per_page: 4 }, None).await?;
        assert_eq!(first.items.len(), 4);
        assert_eq!(first.total_items, 6);
        assert_eq!(first.total_pages, 2);

        let second = list_products(&db, Pagination { page: 2, per_page: 4 }, None).await?;
        assert_eq!(second.items.len(), 2);

        let found = list_products(&db, Pagination::default(), Some("gadget")).await?;
        assert_eq!(found.total_items, 1);
        assert_eq!(found.items[0].name, "Gadget");

        let upper = list_products(&db, Pagination::default(), Some("WIDGET 3")).await?;
        assert_eq!(upper.total_items, 1);
        assert_eq!(upper.items[0].name, "Widget 3");
        Ok(())
    }

    #[tokio::test]
    async fn rejects_negative_values() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = upsert_product(&db, ProductInput { name: "Bad".into(), price_cents: -1, ..Default::default() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(ModelError::Validation(_))));
        let err = upsert_product(&db, ProductInput { name: "Bad".into(), price_cents: 1, stock: Some(-2), ..Default::default() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(ModelError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn update_and_soft_delete() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let p = seed_product(&db, "Kettle", 4_200, 10).await?;
        let updated = upsert_product(&db, ProductInput { id: Some(p.id), name: "Kettle".into(), price_cents: 3_900, stock: Some(8), ..Default::default() }).await?;
        assert_eq!((updated.price_cents, updated.stock), (3_900, 8));

        let repriced = upsert_product(&db, ProductInput { id: Some(p.id), name: "Kettle".into(), price_cents: 3_500, ..Default::default() }).await?;
        assert_eq!((repriced.price_cents, repriced.stock), (3_500, 8), "omitted stock is kept");

        assert!(delete_product(&db, p.id).await?);
        assert!(get_product(&db, p.id).await?.is_none());
        let missing = upsert_product(&db, ProductInput { id: Some(p.id), name: "Kettle".into(), price_cents: 1, ..Default::default() }).await.unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound(_)));
        Ok(())
    }
}
