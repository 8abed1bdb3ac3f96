//! Customer-facing reads. Each public read goes through [`StorefrontCache`];
//! related rows are fetched in batches and grouped in memory.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use common::pagination::Pagination;
use common::types::Page;
use models::{banner, carousel_image, catalog_service, category, homepage_section, homepage_section_service, product, subcategory};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::cache::StorefrontCache;
use crate::catalog::carousel::CarouselSlots;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize)]
pub struct SubcategorySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
}

impl From<&subcategory::Model> for SubcategorySummary {
    fn from(m: &subcategory::Model) -> Self {
        Self { id: m.id, name: m.name.clone(), slug: m.slug.clone(), image_url: m.image_url.clone() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HomepageSectionView {
    pub id: Uuid,
    pub title: String,
    pub sort_order: i32,
    pub subcategory: SubcategorySummary,
    pub services: Vec<catalog_service::Model>,
}

/// Navigation entry: a category with its active subcategories.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub subcategories: Vec<SubcategorySummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubcategoryContent {
    #[serde(flatten)]
    pub subcategory: subcategory::Model,
    pub carousel: CarouselSlots,
    pub services: Vec<catalog_service::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryContent {
    #[serde(flatten)]
    pub category: category::Model,
    pub subcategories: Vec<SubcategoryContent>,
}

fn live_subcategories() -> sea_orm::Select<subcategory::Entity> {
    subcategory::Entity::find()
        .filter(subcategory::Column::IsActive.eq(true))
        .filter(subcategory::Column::DeletedAt.is_null())
}

fn live_services() -> sea_orm::Select<catalog_service::Entity> {
    catalog_service::Entity::find()
        .filter(catalog_service::Column::IsActive.eq(true))
        .filter(catalog_service::Column::DeletedAt.is_null())
}

#[instrument(skip_all)]
pub async fn list_banners_public(db: &DatabaseConnection, cache: &StorefrontCache) -> Result<Arc<Vec<banner::Model>>, ServiceError> {
    Ok(cache
        .banners
        .try_get_with((), async {
            let rows = banner::Entity::find()
                .filter(banner::Column::IsActive.eq(true))
                .order_by_asc(banner::Column::SortOrder)
                .order_by_asc(banner::Column::CreatedAt)
                .all(db)
                .await?;
            Ok::<_, ServiceError>(Arc::new(rows))
        })
        .await?)
}

#[instrument(skip_all)]
pub async fn homepage(db: &DatabaseConnection, cache: &StorefrontCache) -> Result<Arc<Vec<HomepageSectionView>>, ServiceError> {
    Ok(cache.homepage.try_get_with((), load_homepage(db)).await?)
}

async fn load_homepage(db: &DatabaseConnection) -> Result<Arc<Vec<HomepageSectionView>>, ServiceError> {
    let sections = homepage_section::Entity::find()
        .filter(homepage_section::Column::IsActive.eq(true))
        .order_by_asc(homepage_section::Column::SortOrder)
        .order_by_asc(homepage_section::Column::CreatedAt)
        .all(db)
        .await?;
    if sections.is_empty() {
        return Ok(Arc::new(Vec::new()));
    }

    let sub_ids: Vec<Uuid> = sections.iter().map(|s| s.subcategory_id).collect();
    let subs: Vec<subcategory::Model> = live_subcategories()
        .filter(subcategory::Column::Id.is_in(sub_ids))
        .all(db)
        .await?;
    let category_ids: Vec<Uuid> = subs.iter().map(|s| s.category_id).collect();
    let live_categories: HashSet<Uuid> = if category_ids.is_empty() {
        HashSet::new()
    } else {
        category::Entity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .filter(category::Column::IsActive.eq(true))
            .filter(category::Column::DeletedAt.is_null())
            .all(db)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect()
    };
    // sections under a hidden category disappear with it
    let subs: HashMap<Uuid, subcategory::Model> = subs
        .into_iter()
        .filter(|s| live_categories.contains(&s.category_id))
        .map(|s| (s.id, s))
        .collect();

    let section_ids: Vec<Uuid> = sections.iter().map(|s| s.id).collect();
    let members = homepage_section_service::Entity::find()
        .filter(homepage_section_service::Column::SectionId.is_in(section_ids))
        .order_by_asc(homepage_section_service::Column::SortOrder)
        .all(db)
        .await?;
    let service_ids: Vec<Uuid> = members.iter().map(|m| m.service_id).collect();
    let services: HashMap<Uuid, catalog_service::Model> = if service_ids.is_empty() {
        HashMap::new()
    } else {
        live_services()
            .filter(catalog_service::Column::Id.is_in(service_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect()
    };
    let mut by_section: HashMap<Uuid, Vec<catalog_service::Model>> = HashMap::new();
    for m in &members {
        if let Some(svc) = services.get(&m.service_id) {
            by_section.entry(m.section_id).or_default().push(svc.clone());
        }
    }

    let views = sections
        .into_iter()
        .filter_map(|s| {
            let sub = subs.get(&s.subcategory_id)?;
            Some(HomepageSectionView {
                id: s.id,
                title: s.title,
                sort_order: s.sort_order,
                subcategory: SubcategorySummary::from(sub),
                services: by_section.remove(&s.id).unwrap_or_default(),
            })
        })
        .collect();
    Ok(Arc::new(views))
}

/// Carousel slots and live services for each given subcategory, preserving input order.
async fn build_subcategory_content(db: &DatabaseConnection, subs: Vec<subcategory::Model>) -> Result<Vec<SubcategoryContent>, ServiceError> {
    if subs.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = subs.iter().map(|s| s.id).collect();
    let mut images: HashMap<Uuid, Vec<carousel_image::Model>> = HashMap::new();
    for img in carousel_image::Entity::find()
        .filter(carousel_image::Column::SubcategoryId.is_in(ids.clone()))
        .order_by_asc(carousel_image::Column::SortOrder)
        .order_by_asc(carousel_image::Column::CreatedAt)
        .all(db)
        .await?
    {
        images.entry(img.subcategory_id).or_default().push(img);
    }
    let mut services: HashMap<Uuid, Vec<catalog_service::Model>> = HashMap::new();
    for svc in live_services()
        .filter(catalog_service::Column::SubcategoryId.is_in(ids))
        .order_by_asc(catalog_service::Column::Name)
        .all(db)
        .await?
    {
        services.entry(svc.subcategory_id).or_default().push(svc);
    }
    Ok(subs
        .into_iter()
        .map(|sub| SubcategoryContent {
            carousel: CarouselSlots::from_images(images.remove(&sub.id).unwrap_or_default()),
            services: services.remove(&sub.id).unwrap_or_default(),
            subcategory: sub,
        })
        .collect())
}

/// Unknown or hidden slugs are reported as not found.
#[instrument(skip(db, cache))]
pub async fn category_content(db: &DatabaseConnection, cache: &StorefrontCache, slug: &str) -> Result<Arc<CategoryContent>, ServiceError> {
    Ok(cache
        .category_content
        .try_get_with(slug.to_string(), async {
            let category = category::Entity::find()
                .filter(category::Column::Slug.eq(slug))
                .filter(category::Column::IsActive.eq(true))
                .filter(category::Column::DeletedAt.is_null())
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("category"))?;
            let subs = live_subcategories()
                .filter(subcategory::Column::CategoryId.eq(category.id))
                .order_by_asc(subcategory::Column::SortOrder)
                .order_by_asc(subcategory::Column::Name)
                .all(db)
                .await?;
            let subcategories = build_subcategory_content(db, subs).await?;
            Ok::<_, ServiceError>(Arc::new(CategoryContent { category, subcategories }))
        })
        .await?)
}

#[instrument(skip(db, cache))]
pub async fn subcategory_content(db: &DatabaseConnection, cache: &StorefrontCache, slug: &str) -> Result<Arc<SubcategoryContent>, ServiceError> {
    Ok(cache
        .subcategory_content
        .try_get_with(slug.to_string(), async {
            let sub = live_subcategories()
                .filter(subcategory::Column::Slug.eq(slug))
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("subcategory"))?;
            // a hidden parent hides its subcategories too
            let parent_live = category::Entity::find_by_id(sub.category_id)
                .one(db)
                .await?
                .is_some_and(|c| c.is_live());
            if !parent_live {
                return Err(ServiceError::not_found("subcategory"));
            }
            let content = build_subcategory_content(db, vec![sub])
                .await?
                .pop()
                .ok_or_else(|| ServiceError::not_found("subcategory"))?;
            Ok::<_, ServiceError>(Arc::new(content))
        })
        .await?)
}

#[instrument(skip_all)]
pub async fn list_categories_public(db: &DatabaseConnection, cache: &StorefrontCache) -> Result<Arc<Vec<CategoryNode>>, ServiceError> {
    Ok(cache
        .category_tree
        .try_get_with((), async {
            let cats = category::Entity::find()
                .filter(category::Column::IsActive.eq(true))
                .filter(category::Column::DeletedAt.is_null())
                .order_by_asc(category::Column::SortOrder)
                .order_by_asc(category::Column::Name)
                .all(db)
                .await?;
            let mut children: HashMap<Uuid, Vec<SubcategorySummary>> = HashMap::new();
            for sub in live_subcategories()
                .order_by_asc(subcategory::Column::SortOrder)
                .order_by_asc(subcategory::Column::Name)
                .all(db)
                .await?
            {
                children.entry(sub.category_id).or_default().push(SubcategorySummary::from(&sub));
            }
            let tree = cats
                .into_iter()
                .map(|c| CategoryNode {
                    subcategories: children.remove(&c.id).unwrap_or_default(),
                    id: c.id,
                    name: c.name,
                    slug: c.slug,
                    image_url: c.image_url,
                })
                .collect();
            Ok::<_, ServiceError>(Arc::new(tree))
        })
        .await?)
}

#[instrument(skip(db, cache))]
pub async fn get_product_public(db: &DatabaseConnection, cache: &StorefrontCache, slug: &str) -> Result<Arc<product::Model>, ServiceError> {
    Ok(cache
        .products
        .try_get_with(slug.to_string(), async {
            let found = product::Entity::find()
                .filter(product::Column::Slug.eq(slug))
                .filter(product::Column::IsActive.eq(true))
                .filter(product::Column::DeletedAt.is_null())
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("product"))?;
            Ok::<_, ServiceError>(Arc::new(found))
        })
        .await?)
}

#[instrument(skip(db, cache))]
pub async fn get_service_public(db: &DatabaseConnection, cache: &StorefrontCache, slug: &str) -> Result<Arc<catalog_service::Model>, ServiceError> {
    Ok(cache
        .services
        .try_get_with(slug.to_string(), async {
            let found = live_services()
                .filter(catalog_service::Column::Slug.eq(slug))
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("service"))?;
            Ok::<_, ServiceError>(Arc::new(found))
        })
        .await?)
}

/// Live products, newest first. Paged listings are read straight from the database.
#[instrument(skip(db))]
pub async fn list_products_public(
    db: &DatabaseConnection,
    pagination: Pagination,
    category_slug: Option<&str>,
) -> Result<Page<product::Model>, ServiceError> {
    let (page_idx, page_size) = pagination.normalize();
    let (page, per_page) = pagination.clamped();
    let mut finder = product::Entity::find()
        .filter(product::Column::IsActive.eq(true))
        .filter(product::Column::DeletedAt.is_null());
    if let Some(slug) = category_slug {
        let cat = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .filter(category::Column::IsActive.eq(true))
            .filter(category::Column::DeletedAt.is_null())
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("category"))?;
        finder = finder.filter(product::Column::CategoryId.eq(cat.id));
    }
    let paginator = finder
        .order_by_desc(product::Column::CreatedAt)
        .order_by_asc(product::Column::Id)
        .paginate(db, page_size);
    let counts = paginator.num_items_and_pages().await?;
    let items = paginator.fetch_page(page_idx).await?;
    Ok(Page { items, page, per_page, total_items: counts.number_of_items, total_pages: counts.number_of_pages })
}
