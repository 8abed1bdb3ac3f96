use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct BannerInputDoc {
    pub id: Option<Uuid>,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(ToSchema)]
pub struct CategoryInputDoc {
    pub id: Option<Uuid>,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(ToSchema)]
pub struct ProductInputDoc {
    pub id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub name: String,
    pub slug: Option<String>,
    /// HTML
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(ToSchema)]
pub struct SectionInputDoc {
    pub id: Option<Uuid>,
    pub subcategory_id: Uuid,
    pub title: String,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
    pub service_ids: Vec<Uuid>,
}

#[derive(ToSchema)]
pub struct StatusUpdateDoc {
    /// pending, confirmed, processing, shipped, delivered or cancelled
    pub status: String,
}

#[derive(ToSchema)]
pub struct CheckoutItemDoc {
    pub product_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub quantity: i32,
}

#[derive(ToSchema)]
pub struct CheckoutRequestDoc {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub shipping_address: String,
    pub note: Option<String>,
    /// `cod` or `sslcommerz`
    pub payment_method: String,
    pub items: Vec<CheckoutItemDoc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::storefront::banners,
        crate::routes::storefront::homepage,
        crate::routes::storefront::categories,
        crate::routes::storefront::category_content,
        crate::routes::storefront::subcategory_content,
        crate::routes::storefront::products,
        crate::routes::storefront::product,
        crate::routes::storefront::service,
        crate::routes::checkout::place_order,
        crate::routes::checkout::order_status,
        crate::routes::checkout::payment_success,
        crate::routes::checkout::payment_fail,
        crate::routes::checkout::payment_cancel,
        crate::routes::checkout::payment_ipn,
        crate::routes::catalog::list_banners,
        crate::routes::catalog::upsert_banner,
        crate::routes::catalog::delete_banner,
        crate::routes::catalog::list_categories,
        crate::routes::catalog::upsert_category,
        crate::routes::catalog::list_subcategories,
        crate::routes::catalog::list_carousel,
        crate::routes::catalog::list_products,
        crate::routes::catalog::upsert_product,
        crate::routes::catalog::list_services,
        crate::routes::catalog::list_sections,
        crate::routes::catalog::upsert_section,
        crate::routes::orders::list_orders,
        crate::routes::orders::get_order,
        crate::routes::orders::update_order_status,
        crate::routes::media::upload_media,
        crate::routes::media::delete_media,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            BannerInputDoc,
            CategoryInputDoc,
            ProductInputDoc,
            SectionInputDoc,
            StatusUpdateDoc,
            CheckoutItemDoc,
            CheckoutRequestDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "storefront"),
        (name = "checkout"),
        (name = "payment"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
