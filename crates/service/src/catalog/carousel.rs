use std::collections::HashSet;

use chrono::Utc;
use models::status::CarouselPosition;
use models::{carousel_image, validation};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::catalog::subcategory;
use crate::errors::ServiceError;

/// Carousel images of one subcategory split into the three display slots.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CarouselSlots {
    pub left: Vec<carousel_image::Model>,
    pub middle: Vec<carousel_image::Model>,
    pub right: Vec<carousel_image::Model>,
}

impl CarouselSlots {
    /// Expects `images` already ordered by `sort_order`. Rows with an unknown
    /// position are skipped.
    pub fn from_images(images: impl IntoIterator<Item = carousel_image::Model>) -> Self {
        let mut slots = Self::default();
        for img in images {
            match img.position.parse::<CarouselPosition>() {
                Ok(CarouselPosition::Left) => slots.left.push(img),
                Ok(CarouselPosition::Middle) => slots.middle.push(img),
                Ok(CarouselPosition::Right) => slots.right.push(img),
                Err(_) => {}
            }
        }
        slots
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarouselImageInput {
    pub subcategory_id: Uuid,
    pub position: CarouselPosition,
    pub image_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarouselReorder {
    pub subcategory_id: Uuid,
    pub position: CarouselPosition,
    pub ordered_ids: Vec<Uuid>,
}

pub async fn list_carousel(db: &DatabaseConnection, subcategory_id: Uuid) -> Result<CarouselSlots, ServiceError> {
    let images = carousel_image::Entity::find()
        .filter(carousel_image::Column::SubcategoryId.eq(subcategory_id))
        .order_by_asc(carousel_image::Column::SortOrder)
        .order_by_asc(carousel_image::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(CarouselSlots::from_images(images))
}

/// Appends the image at the end of its slot.
#[instrument(skip(db, input), fields(subcategory_id = %input.subcategory_id, position = %input.position))]
pub async fn add_carousel_image(db: &DatabaseConnection, input: CarouselImageInput) -> Result<carousel_image::Model, ServiceError> {
    validation::validate_url("image_url", &input.image_url)?;
    if subcategory::get_subcategory(db, input.subcategory_id).await?.is_none() {
        return Err(ServiceError::Validation("subcategory does not exist".into()));
    }
    let max: Option<Option<i32>> = carousel_image::Entity::find()
        .select_only()
        .column_as(carousel_image::Column::SortOrder.max(), "max_order")
        .filter(carousel_image::Column::SubcategoryId.eq(input.subcategory_id))
        .filter(carousel_image::Column::Position.eq(input.position.as_str()))
        .into_tuple()
        .one(db)
        .await?;
    let next = max.flatten().map_or(0, |m| m + 1);

    let saved = carousel_image::ActiveModel {
        id: Set(Uuid::new_v4()),
        subcategory_id: Set(input.subcategory_id),
        position: Set(input.position.as_str().to_string()),
        image_url: Set(input.image_url),
        sort_order: Set(next),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await?;
    info!(id = %saved.id, sort_order = next, "carousel_image_added");
    Ok(saved)
}

/// Rewrites `sort_order` of one slot. `ordered_ids` must name every image in the slot exactly once.
#[instrument(skip(db, input), fields(subcategory_id = %input.subcategory_id, position = %input.position))]
pub async fn reorder_carousel(db: &DatabaseConnection, input: CarouselReorder) -> Result<Vec<carousel_image::Model>, ServiceError> {
    let txn = db.begin().await?;
    let current: HashSet<Uuid> = carousel_image::Entity::find()
        .select_only()
        .column(carousel_image::Column::Id)
        .filter(carousel_image::Column::SubcategoryId.eq(input.subcategory_id))
        .filter(carousel_image::Column::Position.eq(input.position.as_str()))
        .into_tuple::<Uuid>()
        .all(&txn)
        .await?
        .into_iter()
        .collect();
    let requested: HashSet<Uuid> = input.ordered_ids.iter().copied().collect();
    if requested.len() != input.ordered_ids.len() || requested != current {
        return Err(ServiceError::Validation("ordered_ids must list each image of the slot exactly once".into()));
    }
    for (idx, id) in input.ordered_ids.iter().enumerate() {
        carousel_image::Entity::update_many()
            .col_expr(carousel_image::Column::SortOrder, Expr::value(idx as i32))
            .filter(carousel_image::Column::Id.eq(*id))
            .exec(&txn)
            .await?;
    }
    let reordered = carousel_image::Entity::find()
        .filter(carousel_image::Column::SubcategoryId.eq(input.subcategory_id))
        .filter(carousel_image::Column::Position.eq(input.position.as_str()))
        .order_by_asc(carousel_image::Column::SortOrder)
        .all(&txn)
        .await?;
    txn.commit().await?;
    info!(count = reordered.len(), "carousel_reordered");
    Ok(reordered)
}

/// Hard delete; the removed row is returned so the caller can release its media.
pub async fn delete_carousel_image(db: &DatabaseConnection, id: Uuid) -> Result<Option<carousel_image::Model>, ServiceError> {
    let Some(found) = carousel_image::Entity::find_by_id(id).one(db).await? else { return Ok(None) };
    carousel_image::Entity::delete_by_id(id).exec(db).await?;
    info!(id = %id, "carousel_image_deleted");
    Ok(Some(found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_category, seed_subcategory};

    fn image(sub: Uuid, position: CarouselPosition, n: u32) -> CarouselImageInput {
        CarouselImageInput { subcategory_id: sub, position, image_url: format!("/media/{n}.png") }
    }

    #[tokio::test]
    async fn images_are_appended_per_slot() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let cat = seed_category(&db, "Home").await?;
        let sub = seed_subcategory(&db, cat.id, "Cleaning").await?;

        let a = add_carousel_image(&db, image(sub.id, CarouselPosition::Left, 1)).await?;
        let b = add_carousel_image(&db, image(sub.id, CarouselPosition::Left, 2)).await?;
        let c = add_carousel_image(&db, image(sub.id, CarouselPosition::Right, 3)).await?;
        assert_eq!((a.sort_order, b.sort_order, c.sort_order), (0, 1, 0));

        let slots = list_carousel(&db, sub.id).await?;
        assert_eq!(slots.left.iter().map(|i| i.id).collect::<Vec<_>>(), vec![a.id, b.id]);
        assert!(slots.middle.is_empty());
        assert_eq!(slots.right.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn reorder_requires_exact_slot_ids() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let cat = seed_category(&db, "Home").await?;
        let sub = seed_subcategory(&db, cat.id, "Cleaning").await?;
        let a = add_carousel_image(&db, image(sub.id, CarouselPosition::Middle, 1)).await?;
        let b = add_carousel_image(&db, image(sub.id, CarouselPosition::Middle, 2)).await?;
        let other = add_carousel_image(&db, image(sub.id, CarouselPosition::Left, 3)).await?;

        let reorder = |ids: Vec<Uuid>| CarouselReorder { subcategory_id: sub.id, position: CarouselPosition::Middle, ordered_ids: ids };

        let err = reorder_carousel(&db, reorder(vec![a.id])).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = reorder_carousel(&db, reorder(vec![a.id, other.id])).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = reorder_carousel(&db, reorder(vec![a.id, a.id])).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let done = reorder_carousel(&db, reorder(vec![b.id, a.id])).await?;
        assert_eq!(done.iter().map(|i| i.id).collect::<Vec<_>>(), vec![b.id, a.id]);

        assert!(delete_carousel_image(&db, b.id).await?.is_some());
        assert!(delete_carousel_image(&db, b.id).await?.is_none());
        Ok(())
    }
}
