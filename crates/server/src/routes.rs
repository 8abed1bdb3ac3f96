pub mod auth;
pub mod storefront;
pub mod checkout;
pub mod catalog;
pub mod orders;
pub mod media;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use configs::AppConfig;
use sea_orm::DatabaseConnection;
use service::auth::repo::seaorm::SeaOrmAdminRepository;
use service::auth::AuthService;
use service::cache::StorefrontCache;
use service::media::MediaStore;
use service::payment::PaymentGateway;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: Arc<AuthService<SeaOrmAdminRepository>>,
    pub cache: StorefrontCache,
    pub media: Arc<dyn MediaStore>,
    /// `None` when no online gateway is configured; cash on delivery still works.
    pub gateway: Option<Arc<dyn PaymentGateway>>,
    pub config: Arc<AppConfig>,
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

fn storefront_routes() -> Router<ServerState> {
    Router::new()
        .route("/api/storefront/banners", get(storefront::banners))
        .route("/api/storefront/homepage", get(storefront::homepage))
        .route("/api/storefront/categories", get(storefront::categories))
        .route("/api/storefront/categories/:slug", get(storefront::category_content))
        .route("/api/storefront/subcategories/:slug", get(storefront::subcategory_content))
        .route("/api/storefront/products", get(storefront::products))
        .route("/api/storefront/products/:slug", get(storefront::product))
        .route("/api/storefront/services/:slug", get(storefront::service))
        .route("/api/checkout", post(checkout::place_order))
        .route("/api/orders/:id/status", get(checkout::order_status))
        .route("/api/payment/sslcommerz/success", post(checkout::payment_success))
        .route("/api/payment/sslcommerz/fail", post(checkout::payment_fail))
        .route("/api/payment/sslcommerz/cancel", post(checkout::payment_cancel))
        .route("/api/payment/sslcommerz/ipn", post(checkout::payment_ipn))
}

fn admin_routes(upload_limit: usize) -> Router<ServerState> {
    Router::new()
        .route("/admin/banners", get(catalog::list_banners).post(catalog::upsert_banner))
        .route("/admin/banners/:id", get(catalog::get_banner).delete(catalog::delete_banner))
        .route("/admin/categories", get(catalog::list_categories).post(catalog::upsert_category))
        .route("/admin/categories/:id", get(catalog::get_category).delete(catalog::delete_category))
        .route("/admin/subcategories", get(catalog::list_subcategories).post(catalog::upsert_subcategory))
        .route("/admin/subcategories/:id", get(catalog::get_subcategory).delete(catalog::delete_subcategory))
        .route("/admin/carousel", get(catalog::list_carousel).post(catalog::add_carousel_image))
        .route("/admin/carousel/reorder", post(catalog::reorder_carousel))
        .route("/admin/carousel/:id", delete(catalog::delete_carousel_image))
        .route("/admin/products", get(catalog::list_products).post(catalog::upsert_product))
        .route("/admin/products/:id", get(catalog::get_product).delete(catalog::delete_product))
        .route("/admin/services", get(catalog::list_services).post(catalog::upsert_service))
        .route("/admin/services/:id", get(catalog::get_service).delete(catalog::delete_service))
        .route("/admin/homepage-sections", get(catalog::list_sections).post(catalog::upsert_section))
        .route("/admin/homepage-sections/:id", get(catalog::get_section).delete(catalog::delete_section))
        .route("/admin/orders", get(orders::list_orders))
        .route("/admin/orders/:id", get(orders::get_order).delete(orders::delete_order))
        .route("/admin/orders/:id/status", put(orders::update_order_status))
        .route(
            "/admin/media",
            post(media::upload_media).layer(DefaultBodyLimit::max(upload_limit.saturating_add(64 * 1024))),
        )
        .route("/admin/media/:key", delete(media::delete_media))
        .route("/auth/me", get(auth::me))
}

/// Full application router: storefront, checkout and callbacks in the open,
/// `/admin/**` and `/auth/me` behind the admin JWT check.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let media_cfg = state.config.media.clone();

    let protected = admin_routes(media_cfg.max_upload_bytes)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_admin));

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .merge(storefront_routes())
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Absolute public URLs mean a CDN or another host serves the files.
    let media_path = media_cfg.public_base_url.trim_end_matches('/');
    if media_path.starts_with('/') {
        app = app.nest_service(media_path, ServeDir::new(&media_cfg.root));
    }

    app.with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
