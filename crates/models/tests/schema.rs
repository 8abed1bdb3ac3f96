use chrono::Utc;
use migration::MigratorTrait;
use models::{category, subcategory};
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, Set};
use uuid::Uuid;

async fn migrated() -> anyhow::Result<sea_orm::DatabaseConnection> {
    let db = models::db::connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

fn new_category(slug: &str) -> category::ActiveModel {
    let now = Utc::now().into();
    category::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Home".into()),
        slug: Set(slug.into()),
        description: Set(None),
        image_url: Set(None),
        sort_order: Set(0),
        is_active: Set(true),
        deleted_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

#[tokio::test]
async fn migrations_apply_and_roll_back() -> anyhow::Result<()> {
    let db = migrated().await?;
    assert!(category::Entity::find().all(&db).await?.is_empty());
    migration::Migrator::down(&db, None).await?;
    assert!(category::Entity::find().all(&db).await.is_err());
    Ok(())
}

#[tokio::test]
async fn category_slug_is_unique() -> anyhow::Result<()> {
    let db = migrated().await?;
    new_category("plumbing").insert(&db).await?;
    let err = new_category("plumbing").insert(&db).await.unwrap_err();
    assert!(matches!(err.sql_err(), Some(sea_orm::SqlErr::UniqueConstraintViolation(_))), "got {err:?}");
    Ok(())
}

#[tokio::test]
async fn subcategories_follow_their_category() -> anyhow::Result<()> {
    let db = migrated().await?;
    let cat = new_category("cleaning").insert(&db).await?;
    let now = Utc::now().into();
    subcategory::ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(cat.id),
        name: Set("Sofa".into()),
        slug: Set("sofa".into()),
        description: Set(None),
        image_url: Set(None),
        sort_order: Set(0),
        is_active: Set(true),
        deleted_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&db)
    .await?;

    let subs = cat.find_related(subcategory::Entity).all(&db).await?;
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].slug, "sofa");
    Ok(())
}
