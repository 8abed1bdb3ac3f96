//! Admin actions for banners, categories, subcategories, carousels, products,
//! services and homepage sections. Every successful mutation drops the
//! storefront cache scope that depends on it.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use common::pagination::Pagination;
use common::types::{ActionOk, Page};
use models::{banner, carousel_image, catalog_service, category, homepage_section, product, subcategory};
use serde::Deserialize;
use service::catalog::banner::{self as banners, BannerInput};
use service::catalog::carousel::{self, CarouselImageInput, CarouselReorder, CarouselSlots};
use service::catalog::category::{self as categories, CategoryInput};
use service::catalog::homepage::{self, SectionDetail, SectionInput};
use service::catalog::offering::{self, ServiceInput};
use service::catalog::product::{self as products, ProductInput};
use service::catalog::subcategory::{self as subcategories, SubcategoryInput};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

type ApiResult<T> = Result<Json<ActionOk<T>>, JsonApiError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ActionOk::new(data)))
}

fn found<T>(entity: &str, value: Option<T>) -> ApiResult<T> {
    value.map(|v| Json(ActionOk::new(v))).ok_or_else(|| JsonApiError::not_found(format!("{entity} not found")))
}

fn deleted(entity: &str, removed: bool) -> ApiResult<bool> {
    if removed { ok(true) } else { Err(JsonApiError::not_found(format!("{entity} not found"))) }
}

/// Best effort: the row is already gone, so leftover files are only logged.
async fn release_media(state: &ServerState, url: &str) {
    let Some(key) = state.media.key_for_url(url) else { return };
    if let Err(e) = state.media.delete(&key).await {
        warn!(event = "media_release_failed", key = %key, error = %e);
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubcategoryFilter {
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceFilter {
    pub subcategory_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CarouselQuery {
    pub subcategory_id: Uuid,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub search: Option<String>,
}

// banners

#[utoipa::path(get, path = "/admin/banners", tag = "admin", responses((status = 200, description = "List OK")))]
pub async fn list_banners(State(state): State<ServerState>) -> ApiResult<Vec<banner::Model>> {
    ok(banners::list_banners(&state.db).await?)
}

pub async fn get_banner(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<banner::Model> {
    found("banner", banners::get_banner(&state.db, id).await?)
}

#[utoipa::path(post, path = "/admin/banners", tag = "admin", request_body = crate::openapi::BannerInputDoc, responses((status = 200, description = "Saved"), (status = 400, description = "Validation Error"), (status = 404, description = "Not Found")))]
pub async fn upsert_banner(State(state): State<ServerState>, Json(input): Json<BannerInput>) -> ApiResult<banner::Model> {
    let previous = match input.id {
        Some(id) => banners::get_banner(&state.db, id).await?.map(|b| b.image_url),
        None => None,
    };
    let saved = banners::upsert_banner(&state.db, input).await?;
    state.cache.invalidate_banners();
    if let Some(old) = previous.filter(|old| *old != saved.image_url) {
        release_media(&state, &old).await;
    }
    ok(saved)
}

#[utoipa::path(delete, path = "/admin/banners/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Banner id")), responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete_banner(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<bool> {
    let removed = banners::delete_banner(&state.db, id).await?;
    if let Some(b) = &removed {
        state.cache.invalidate_banners();
        release_media(&state, &b.image_url).await;
    }
    deleted("banner", removed.is_some())
}

// categories

#[utoipa::path(get, path = "/admin/categories", tag = "admin", responses((status = 200, description = "List OK")))]
pub async fn list_categories(State(state): State<ServerState>) -> ApiResult<Vec<category::Model>> {
    ok(categories::list_categories(&state.db).await?)
}

pub async fn get_category(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<category::Model> {
    found("category", categories::get_category(&state.db, id).await?)
}

#[utoipa::path(post, path = "/admin/categories", tag = "admin", request_body = crate::openapi::CategoryInputDoc, responses((status = 200, description = "Saved"), (status = 400, description = "Validation Error"), (status = 409, description = "Slug taken")))]
pub async fn upsert_category(State(state): State<ServerState>, Json(input): Json<CategoryInput>) -> ApiResult<category::Model> {
    let saved = categories::upsert_category(&state.db, input).await?;
    state.cache.invalidate_catalog();
    ok(saved)
}

pub async fn delete_category(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<bool> {
    let removed = categories::delete_category(&state.db, id).await?;
    if removed {
        state.cache.invalidate_catalog();
        // products keep their category id; product pages may show it
        state.cache.invalidate_products();
    }
    deleted("category", removed)
}

// subcategories

#[utoipa::path(get, path = "/admin/subcategories", tag = "admin", params(SubcategoryFilter), responses((status = 200, description = "List OK")))]
pub async fn list_subcategories(State(state): State<ServerState>, Query(q): Query<SubcategoryFilter>) -> ApiResult<Vec<subcategory::Model>> {
    ok(subcategories::list_subcategories(&state.db, q.category_id).await?)
}

pub async fn get_subcategory(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<subcategory::Model> {
    found("subcategory", subcategories::get_subcategory(&state.db, id).await?)
}

pub async fn upsert_subcategory(State(state): State<ServerState>, Json(input): Json<SubcategoryInput>) -> ApiResult<subcategory::Model> {
    let saved = subcategories::upsert_subcategory(&state.db, input).await?;
    state.cache.invalidate_catalog();
    ok(saved)
}

pub async fn delete_subcategory(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<bool> {
    let removed = subcategories::delete_subcategory(&state.db, id).await?;
    if removed {
        state.cache.invalidate_catalog();
    }
    deleted("subcategory", removed)
}

// carousel

#[utoipa::path(get, path = "/admin/carousel", tag = "admin", params(CarouselQuery), responses((status = 200, description = "Slots")))]
pub async fn list_carousel(State(state): State<ServerState>, Query(q): Query<CarouselQuery>) -> ApiResult<CarouselSlots> {
    ok(carousel::list_carousel(&state.db, q.subcategory_id).await?)
}

pub async fn add_carousel_image(State(state): State<ServerState>, Json(input): Json<CarouselImageInput>) -> ApiResult<carousel_image::Model> {
    let saved = carousel::add_carousel_image(&state.db, input).await?;
    state.cache.invalidate_catalog();
    ok(saved)
}

pub async fn reorder_carousel(State(state): State<ServerState>, Json(input): Json<CarouselReorder>) -> ApiResult<Vec<carousel_image::Model>> {
    let images = carousel::reorder_carousel(&state.db, input).await?;
    state.cache.invalidate_catalog();
    ok(images)
}

pub async fn delete_carousel_image(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<bool> {
    let removed = carousel::delete_carousel_image(&state.db, id).await?;
    if let Some(img) = &removed {
        state.cache.invalidate_catalog();
        release_media(&state, &img.image_url).await;
    }
    deleted("carousel image", removed.is_some())
}

// products

#[utoipa::path(get, path = "/admin/products", tag = "admin", params(ProductQuery), responses((status = 200, description = "Product page")))]
pub async fn list_products(State(state): State<ServerState>, Query(q): Query<ProductQuery>) -> ApiResult<Page<product::Model>> {
    let d = Pagination::default();
    let pagination = Pagination { page: q.page.unwrap_or(d.page), per_page: q.per_page.unwrap_or(d.per_page) };
    ok(products::list_products(&state.db, pagination, q.search.as_deref()).await?)
}

pub async fn get_product(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<product::Model> {
    found("product", products::get_product(&state.db, id).await?)
}

#[utoipa::path(post, path = "/admin/products", tag = "admin", request_body = crate::openapi::ProductInputDoc, responses((status = 200, description = "Saved"), (status = 400, description = "Validation Error"), (status = 409, description = "Slug taken")))]
pub async fn upsert_product(State(state): State<ServerState>, Json(input): Json<ProductInput>) -> ApiResult<product::Model> {
    let saved = products::upsert_product(&state.db, input).await?;
    state.cache.invalidate_products();
    ok(saved)
}

pub async fn delete_product(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<bool> {
    let removed = products::delete_product(&state.db, id).await?;
    if removed {
        state.cache.invalidate_products();
    }
    deleted("product", removed)
}

// services

#[utoipa::path(get, path = "/admin/services", tag = "admin", params(ServiceFilter), responses((status = 200, description = "List OK")))]
pub async fn list_services(State(state): State<ServerState>, Query(q): Query<ServiceFilter>) -> ApiResult<Vec<catalog_service::Model>> {
    ok(offering::list_services(&state.db, q.subcategory_id).await?)
}

pub async fn get_service(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<catalog_service::Model> {
    found("service", offering::get_service(&state.db, id).await?)
}

pub async fn upsert_service(State(state): State<ServerState>, Json(input): Json<ServiceInput>) -> ApiResult<catalog_service::Model> {
    let saved = offering::upsert_service(&state.db, input).await?;
    state.cache.invalidate_catalog();
    ok(saved)
}

pub async fn delete_service(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<bool> {
    let removed = offering::delete_service(&state.db, id).await?;
    if removed {
        state.cache.invalidate_catalog();
    }
    deleted("service", removed)
}

// homepage sections

#[utoipa::path(get, path = "/admin/homepage-sections", tag = "admin", responses((status = 200, description = "List OK")))]
pub async fn list_sections(State(state): State<ServerState>) -> ApiResult<Vec<homepage_section::Model>> {
    ok(homepage::list_sections(&state.db).await?)
}

pub async fn get_section(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<SectionDetail> {
    found("homepage section", homepage::get_section(&state.db, id).await?)
}

#[utoipa::path(post, path = "/admin/homepage-sections", tag = "admin", request_body = crate::openapi::SectionInputDoc, responses((status = 200, description = "Saved"), (status = 400, description = "Validation Error")))]
pub async fn upsert_section(State(state): State<ServerState>, Json(input): Json<SectionInput>) -> ApiResult<SectionDetail> {
    let saved = homepage::upsert_section(&state.db, input).await?;
    state.cache.invalidate_catalog();
    info!(section_id = %saved.section.id, "homepage section saved");
    ok(saved)
}

pub async fn delete_section(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<bool> {
    let removed = homepage::delete_section(&state.db, id).await?;
    if removed {
        state.cache.invalidate_catalog();
    }
    deleted("homepage section", removed)
}
