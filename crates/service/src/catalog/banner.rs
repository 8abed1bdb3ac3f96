use chrono::Utc;
use models::{banner, validation};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BannerInput {
    /// Present when editing an existing banner.
    #[serde(default)]
    pub id: Option<Uuid>,
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// All banners, in display order.
pub async fn list_banners(db: &DatabaseConnection) -> Result<Vec<banner::Model>, ServiceError> {
    Ok(banner::Entity::find()
        .order_by_asc(banner::Column::SortOrder)
        .order_by_asc(banner::Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn get_banner(db: &DatabaseConnection, id: Uuid) -> Result<Option<banner::Model>, ServiceError> {
    Ok(banner::Entity::find_by_id(id).one(db).await?)
}

/// Create when `input.id` is absent, otherwise update that banner.
#[instrument(skip(db, input), fields(id = ?input.id))]
pub async fn upsert_banner(db: &DatabaseConnection, input: BannerInput) -> Result<banner::Model, ServiceError> {
    let title = validation::validate_name("title", &input.title)?;
    validation::validate_url("image_url", &input.image_url)?;
    let link_url = validation::non_blank(input.link_url);
    if let Some(link) = &link_url {
        validation::validate_url("link_url", link)?;
    }
    let now = Utc::now().into();

    let saved = match input.id {
        None => {
            let am = banner::ActiveModel {
                id: Set(Uuid::new_v4()),
                title: Set(title),
                image_url: Set(input.image_url),
                link_url: Set(link_url),
                sort_order: Set(input.sort_order.unwrap_or(0)),
                is_active: Set(input.is_active.unwrap_or(true)),
                created_at: Set(now),
                updated_at: Set(now),
            };
            am.insert(db).await?
        }
        Some(id) => {
            let mut am: banner::ActiveModel = banner::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("banner"))?
                .into();
            am.title = Set(title);
            am.image_url = Set(input.image_url);
            am.link_url = Set(link_url);
            if let Some(o) = input.sort_order { am.sort_order = Set(o); }
            if let Some(a) = input.is_active { am.is_active = Set(a); }
            am.updated_at = Set(now);
            am.update(db).await?
        }
    };
    info!(id = %saved.id, "banner_saved");
    Ok(saved)
}

/// Hard delete; returns the removed row so its image can be released.
pub async fn delete_banner(db: &DatabaseConnection, id: Uuid) -> Result<Option<banner::Model>, ServiceError> {
    let Some(found) = banner::Entity::find_by_id(id).one(db).await? else { return Ok(None) };
    banner::Entity::delete_by_id(id).exec(db).await?;
    info!(id = %id, "banner_deleted");
    Ok(Some(found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn banner_crud_service() -> Result<(), anyhow::Error> {
        let db = get_db().await?;

        let b = upsert_banner(&db, BannerInput { title: "Eid Sale".into(), image_url: "/media/x.png".into(), sort_order: Some(2), ..Default::default() }).await?;
        assert!(b.is_active);
        let first = upsert_banner(&db, BannerInput { title: "Top".into(), image_url: "https://cdn.example.com/top.png".into(), sort_order: Some(1), ..Default::default() }).await?;

        let list = list_banners(&db).await?;
        assert_eq!(list.iter().map(|x| x.id).collect::<Vec<_>>(), vec![first.id, b.id]);

        let updated = upsert_banner(&db, BannerInput { id: Some(b.id), title: "Eid Mega Sale".into(), image_url: b.image_url.clone(), is_active: Some(false), ..Default::default() }).await?;
        assert_eq!(updated.title, "Eid Mega Sale");
        assert!(!updated.is_active);
        assert_eq!(updated.sort_order, 2);

        let removed = delete_banner(&db, b.id).await?;
        assert!(removed.is_some());
        assert!(get_banner(&db, b.id).await?.is_none());
        assert!(delete_banner(&db, b.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn upsert_unknown_id_is_not_found() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = upsert_banner(&db, BannerInput { id: Some(Uuid::new_v4()), title: "t".into(), image_url: "/media/a.png".into(), ..Default::default() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn rejects_invalid_urls() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = upsert_banner(&db, BannerInput { title: "t".into(), image_url: "javascript:alert(1)".into(), ..Default::default() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(_)));
        Ok(())
    }
}
