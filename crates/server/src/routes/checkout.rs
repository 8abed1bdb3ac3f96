//! Customer checkout, order status polling and gateway callbacks.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use common::types::ActionOk;
use service::orders::checkout::{self, CheckoutInput, CheckoutResult};
use service::orders::{self, OrderStatusView};
use service::payment::callbacks::{process_callback, CallbackForm, CallbackKind, CallbackOutcome};
use service::errors::ServiceError;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[utoipa::path(post, path = "/api/checkout", tag = "checkout", request_body = crate::openapi::CheckoutRequestDoc, responses(
    (status = 201, description = "Order placed"),
    (status = 400, description = "Validation Error"),
    (status = 409, description = "Insufficient stock"),
    (status = 502, description = "Payment gateway unavailable")
))]
pub async fn place_order(
    State(state): State<ServerState>,
    Json(input): Json<CheckoutInput>,
) -> Result<(StatusCode, Json<ActionOk<CheckoutResult>>), JsonApiError> {
    let gateway = state.gateway.as_deref();
    let result = checkout::place_order(&state.db, gateway, &state.config.payment.currency, input).await;
    // a gateway failure comes after the stock decrement was committed
    if matches!(result, Ok(_) | Err(ServiceError::Gateway(_))) {
        state.cache.invalidate_products();
    }
    Ok((StatusCode::CREATED, Json(ActionOk::new(result?))))
}

#[utoipa::path(get, path = "/api/orders/{id}/status", tag = "checkout", params(("id" = Uuid, Path, description = "Order id")), responses((status = 200, description = "Order status"), (status = 404, description = "Not Found")))]
pub async fn order_status(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<ActionOk<OrderStatusView>>, JsonApiError> {
    let view = orders::order_status(&state.db, id, state.config.storefront.poll_interval_ms).await?;
    Ok(Json(ActionOk::new(view)))
}

async fn handle(state: &ServerState, kind: CallbackKind, form: CallbackForm) -> Result<CallbackOutcome, JsonApiError> {
    let gateway = state
        .gateway
        .as_deref()
        .ok_or_else(|| ServiceError::Gateway("online payment is not configured".into()))?;
    Ok(process_callback(&state.db, gateway, kind, form).await?)
}

/// Browser-facing callbacks end on the storefront result page, which then polls the order status.
fn redirect_to_result(state: &ServerState, outcome: &CallbackOutcome) -> Response {
    let base = &state.config.storefront.payment_return_url;
    let sep = if base.contains('?') { '&' } else { '?' };
    let target = format!("{base}{sep}order_id={}&payment_status={}", outcome.order_id, outcome.payment_status);
    Redirect::to(&target).into_response()
}

#[utoipa::path(post, path = "/api/payment/sslcommerz/success", tag = "payment", responses((status = 303, description = "Redirect to result page")))]
pub async fn payment_success(State(state): State<ServerState>, Form(form): Form<CallbackForm>) -> Result<Response, JsonApiError> {
    let outcome = handle(&state, CallbackKind::Success, form).await?;
    Ok(redirect_to_result(&state, &outcome))
}

#[utoipa::path(post, path = "/api/payment/sslcommerz/fail", tag = "payment", responses((status = 303, description = "Redirect to result page")))]
pub async fn payment_fail(State(state): State<ServerState>, Form(form): Form<CallbackForm>) -> Result<Response, JsonApiError> {
    let outcome = handle(&state, CallbackKind::Fail, form).await?;
    Ok(redirect_to_result(&state, &outcome))
}

#[utoipa::path(post, path = "/api/payment/sslcommerz/cancel", tag = "payment", responses((status = 303, description = "Redirect to result page")))]
pub async fn payment_cancel(State(state): State<ServerState>, Form(form): Form<CallbackForm>) -> Result<Response, JsonApiError> {
    let outcome = handle(&state, CallbackKind::Cancel, form).await?;
    Ok(redirect_to_result(&state, &outcome))
}

/// Server-to-server notification; answered with JSON.
#[utoipa::path(post, path = "/api/payment/sslcommerz/ipn", tag = "payment", responses((status = 200, description = "Processed")))]
pub async fn payment_ipn(State(state): State<ServerState>, Form(form): Form<CallbackForm>) -> Result<Json<ActionOk<CallbackOutcome>>, JsonApiError> {
    Ok(Json(ActionOk::new(handle(&state, CallbackKind::Ipn, form).await?)))
}
