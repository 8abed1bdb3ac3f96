use axum::{
    extract::{Path, Query, State},
    Json,
};
use common::pagination::Pagination;
use common::types::{ActionOk, Page};
use models::order;
use models::status::OrderStatus;
use serde::Deserialize;
use service::orders::{self, OrderDetail};
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// One of pending, confirmed, processing, shipped, delivered, cancelled
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

#[utoipa::path(get, path = "/admin/orders", tag = "admin", params(OrderQuery), responses((status = 200, description = "Order page"), (status = 400, description = "Unknown status")))]
pub async fn list_orders(State(state): State<ServerState>, Query(q): Query<OrderQuery>) -> Result<Json<ActionOk<Page<order::Model>>>, JsonApiError> {
    let status = q
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(|e| JsonApiError::bad_request(e.to_string()))?;
    let d = Pagination::default();
    let pagination = Pagination { page: q.page.unwrap_or(d.page), per_page: q.per_page.unwrap_or(d.per_page) };
    Ok(Json(ActionOk::new(orders::list_orders(&state.db, pagination, status).await?)))
}

#[utoipa::path(get, path = "/admin/orders/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Order id")), responses((status = 200, description = "Order with items and payments"), (status = 404, description = "Not Found")))]
pub async fn get_order(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<ActionOk<OrderDetail>>, JsonApiError> {
    orders::get_order(&state.db, id)
        .await?
        .map(|d| Json(ActionOk::new(d)))
        .ok_or_else(|| JsonApiError::not_found("order not found"))
}

#[utoipa::path(put, path = "/admin/orders/{id}/status", tag = "admin", params(("id" = Uuid, Path, description = "Order id")), request_body = crate::openapi::StatusUpdateDoc, responses(
    (status = 200, description = "Updated"),
    (status = 400, description = "Unknown status"),
    (status = 409, description = "Order is final")
))]
pub async fn update_order_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<ActionOk<order::Model>>, JsonApiError> {
    let status: OrderStatus = body.status.parse().map_err(|e: models::errors::ModelError| JsonApiError::bad_request(e.to_string()))?;
    Ok(Json(ActionOk::new(orders::update_order_status(&state.db, id, status).await?)))
}

pub async fn delete_order(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<ActionOk<bool>>, JsonApiError> {
    if orders::delete_order(&state.db, id).await? {
        Ok(Json(ActionOk::new(true)))
    } else {
        Err(JsonApiError::not_found("order not found"))
    }
}
