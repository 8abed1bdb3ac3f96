use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use common::pagination::Pagination;
use common::types::{ActionOk, Page};
use models::{banner, catalog_service, product};
use serde::Deserialize;
use service::storefront::{self, CategoryContent, CategoryNode, HomepageSectionView, SubcategoryContent};

use crate::errors::JsonApiError;
use crate::routes::ServerState;

type ApiResult<T> = Result<Json<ActionOk<T>>, JsonApiError>;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    /// Category slug
    #[serde(default)]
    pub category: Option<String>,
}

impl ProductListQuery {
    fn pagination(&self) -> Pagination {
        let d = Pagination::default();
        Pagination { page: self.page.unwrap_or(d.page), per_page: self.per_page.unwrap_or(d.per_page) }
    }
}

#[utoipa::path(get, path = "/api/storefront/banners", tag = "storefront", responses((status = 200, description = "Active banners")))]
pub async fn banners(State(state): State<ServerState>) -> ApiResult<Arc<Vec<banner::Model>>> {
    Ok(Json(ActionOk::new(storefront::list_banners_public(&state.db, &state.cache).await?)))
}

#[utoipa::path(get, path = "/api/storefront/homepage", tag = "storefront", responses((status = 200, description = "Homepage sections")))]
pub async fn homepage(State(state): State<ServerState>) -> ApiResult<Arc<Vec<HomepageSectionView>>> {
    Ok(Json(ActionOk::new(storefront::homepage(&state.db, &state.cache).await?)))
}

#[utoipa::path(get, path = "/api/storefront/categories", tag = "storefront", responses((status = 200, description = "Navigation tree")))]
pub async fn categories(State(state): State<ServerState>) -> ApiResult<Arc<Vec<CategoryNode>>> {
    Ok(Json(ActionOk::new(storefront::list_categories_public(&state.db, &state.cache).await?)))
}

#[utoipa::path(get, path = "/api/storefront/categories/{slug}", tag = "storefront", params(("slug" = String, Path, description = "Category slug")), responses((status = 200, description = "Category page"), (status = 404, description = "Not Found")))]
pub async fn category_content(State(state): State<ServerState>, Path(slug): Path<String>) -> ApiResult<Arc<CategoryContent>> {
    Ok(Json(ActionOk::new(storefront::category_content(&state.db, &state.cache, &slug).await?)))
}

#[utoipa::path(get, path = "/api/storefront/subcategories/{slug}", tag = "storefront", params(("slug" = String, Path, description = "Subcategory slug")), responses((status = 200, description = "Subcategory page"), (status = 404, description = "Not Found")))]
pub async fn subcategory_content(State(state): State<ServerState>, Path(slug): Path<String>) -> ApiResult<Arc<SubcategoryContent>> {
    Ok(Json(ActionOk::new(storefront::subcategory_content(&state.db, &state.cache, &slug).await?)))
}

#[utoipa::path(get, path = "/api/storefront/products", tag = "storefront", params(ProductListQuery), responses((status = 200, description = "Product page")))]
pub async fn products(State(state): State<ServerState>, Query(q): Query<ProductListQuery>) -> ApiResult<Page<product::Model>> {
    let page = storefront::list_products_public(&state.db, q.pagination(), q.category.as_deref()).await?;
    Ok(Json(ActionOk::new(page)))
}

#[utoipa::path(get, path = "/api/storefront/products/{slug}", tag = "storefront", params(("slug" = String, Path, description = "Product slug")), responses((status = 200, description = "Product"), (status = 404, description = "Not Found")))]
pub async fn product(State(state): State<ServerState>, Path(slug): Path<String>) -> ApiResult<Arc<product::Model>> {
    Ok(Json(ActionOk::new(storefront::get_product_public(&state.db, &state.cache, &slug).await?)))
}

#[utoipa::path(get, path = "/api/storefront/services/{slug}", tag = "storefront", params(("slug" = String, Path, description = "Service slug")), responses((status = 200, description = "Service"), (status = 404, description = "Not Found")))]
pub async fn service(State(state): State<ServerState>, Path(slug): Path<String>) -> ApiResult<Arc<catalog_service::Model>> {
    Ok(Json(ActionOk::new(storefront::get_service_public(&state.db, &state.cache, &slug).await?)))
}
