//! Orders: admin management, checkout, and customer status polling.

pub mod checkout;

use chrono::Utc;
use common::pagination::Pagination;
use common::types::Page;
use models::status::{OrderStatus, PaymentMethod, PaymentStatus};
use models::{order, order_item, payment};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: order::Model,
    pub items: Vec<order_item::Model>,
    pub payments: Vec<payment::Model>,
}

/// Polling payload for the payment result page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderStatusView {
    pub order_id: Uuid,
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub settled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_after_ms: Option<u64>,
}

/// Newest first, optionally limited to one status.
pub async fn list_orders(
    db: &DatabaseConnection,
    pagination: Pagination,
    status: Option<OrderStatus>,
) -> Result<Page<order::Model>, ServiceError> {
    let (page_idx, page_size) = pagination.normalize();
    let (page, per_page) = pagination.clamped();
    let mut finder = order::Entity::find().filter(order::Column::DeletedAt.is_null());
    if let Some(s) = status {
        finder = finder.filter(order::Column::Status.eq(s.as_str()));
    }
    let paginator = finder
        .order_by_desc(order::Column::CreatedAt)
        .order_by_asc(order::Column::Id)
        .paginate(db, page_size);
    let counts = paginator.num_items_and_pages().await?;
    let items = paginator.fetch_page(page_idx).await?;
    Ok(Page { items, page, per_page, total_items: counts.number_of_items, total_pages: counts.number_of_pages })
}

async fn find_live(db: &DatabaseConnection, id: Uuid) -> Result<Option<order::Model>, ServiceError> {
    Ok(order::Entity::find_by_id(id)
        .filter(order::Column::DeletedAt.is_null())
        .one(db)
        .await?)
}

pub async fn get_order(db: &DatabaseConnection, id: Uuid) -> Result<Option<OrderDetail>, ServiceError> {
    let Some(order) = find_live(db, id).await? else { return Ok(None) };
    let items = order_item::Entity::find()
        .filter(order_item::Column::OrderId.eq(id))
        .order_by_asc(order_item::Column::Name)
        .all(db)
        .await?;
    let payments = payment::Entity::find()
        .filter(payment::Column::OrderId.eq(id))
        .order_by_asc(payment::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(Some(OrderDetail { order, items, payments }))
}

/// Delivered and cancelled orders are final; setting the current status again is a no-op.
#[instrument(skip(db))]
pub async fn update_order_status(db: &DatabaseConnection, id: Uuid, status: OrderStatus) -> Result<order::Model, ServiceError> {
    let found = find_live(db, id).await?.ok_or_else(|| ServiceError::not_found("order"))?;
    let current: OrderStatus = found.status.parse()?;
    if current == status {
        return Ok(found);
    }
    if current.is_terminal() {
        return Err(ServiceError::Conflict(format!("order is {current} and can no longer change")));
    }
    let mut am: order::ActiveModel = found.into();
    am.status = Set(status.as_str().to_string());
    am.updated_at = Set(Utc::now().into());
    let saved = am.update(db).await?;
    info!(event = "order_status_changed", order_id = %id, from = %current, to = %status);
    Ok(saved)
}

pub async fn delete_order(db: &DatabaseConnection, id: Uuid) -> Result<bool, ServiceError> {
    let Some(found) = find_live(db, id).await? else { return Ok(false) };
    let mut am: order::ActiveModel = found.into();
    am.deleted_at = Set(Some(Utc::now().into()));
    am.update(db).await?;
    info!(order_id = %id, "order_soft_deleted");
    Ok(true)
}

/// `poll_interval_ms` is echoed back while the payment is still open.
pub async fn order_status(db: &DatabaseConnection, id: Uuid, poll_interval_ms: u64) -> Result<OrderStatusView, ServiceError> {
    let order = find_live(db, id).await?.ok_or_else(|| ServiceError::not_found("order"))?;
    let latest = payment::Entity::find()
        .filter(payment::Column::OrderId.eq(id))
        .order_by_desc(payment::Column::CreatedAt)
        .one(db)
        .await?;
    let method: PaymentMethod = order.payment_method.parse()?;
    let payment_status = match &latest {
        Some(p) => p.status.parse()?,
        None => PaymentStatus::Pending,
    };
    let settled = method == PaymentMethod::Cod || payment_status != PaymentStatus::Pending;
    Ok(OrderStatusView {
        order_id: order.id,
        status: order.status.parse()?,
        order_number: order.order_number,
        payment_status,
        settled,
        poll_after_ms: (!settled).then_some(poll_interval_ms),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::checkout::{place_order, CheckoutInput, CheckoutItem};
    use crate::payment::mock::MockGateway;
    use crate::test_support::{get_db, seed_product};

    fn cod_order(product_id: Uuid) -> CheckoutInput {
        CheckoutInput {
            customer_name: "Rahim".into(),
            customer_phone: "+8801700000000".into(),
            customer_email: None,
            shipping_address: "House 1, Road 2, Dhaka".into(),
            note: None,
            payment_method: PaymentMethod::Cod,
            items: vec![CheckoutItem { product_id: Some(product_id), service_id: None, quantity: 1 }],
        }
    }

    #[tokio::test]
    async fn terminal_orders_cannot_change() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let p = seed_product(&db, "Lamp", 1_000, 5).await?;
        let placed = place_order(&db, None, "BDT", cod_order(p.id)).await?;

        let confirmed = update_order_status(&db, placed.order_id, OrderStatus::Confirmed).await?;
        assert_eq!(confirmed.status, "confirmed");
        update_order_status(&db, placed.order_id, OrderStatus::Cancelled).await?;
        let err = update_order_status(&db, placed.order_id, OrderStatus::Processing).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        // same status again is accepted
        update_order_status(&db, placed.order_id, OrderStatus::Cancelled).await?;
        Ok(())
    }

    #[tokio::test]
    async fn detail_list_and_soft_delete() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let p = seed_product(&db, "Lamp", 1_000, 5).await?;
        let a = place_order(&db, None, "BDT", cod_order(p.id)).await?;
        place_order(&db, None, "BDT", cod_order(p.id)).await?;
        update_order_status(&db, a.order_id, OrderStatus::Confirmed).await?;

        let detail = get_order(&db, a.order_id).await?.expect("order");
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.payments.len(), 1);
        assert_eq!(detail.order.total_cents, 1_000);

        assert_eq!(list_orders(&db, Pagination::default(), None).await?.total_items, 2);
        assert_eq!(list_orders(&db, Pagination::default(), Some(OrderStatus::Confirmed)).await?.total_items, 1);

        assert!(delete_order(&db, a.order_id).await?);
        assert!(get_order(&db, a.order_id).await?.is_none());
        assert_eq!(list_orders(&db, Pagination::default(), None).await?.total_items, 1);
        Ok(())
    }

    #[tokio::test]
    async fn status_view_polls_until_settled() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let p = seed_product(&db, "Lamp", 1_000, 5).await?;

        let cod = place_order(&db, None, "BDT", cod_order(p.id)).await?;
        let view = order_status(&db, cod.order_id, 2_000).await?;
        assert!(view.settled);
        assert_eq!(view.poll_after_ms, None);

        let gateway = MockGateway::new();
        let mut online = cod_order(p.id);
        online.payment_method = PaymentMethod::SslCommerz;
        let placed = place_order(&db, Some(&gateway), "BDT", online).await?;
        let view = order_status(&db, placed.order_id, 2_000).await?;
        assert!(!view.settled);
        assert_eq!(view.payment_status, PaymentStatus::Pending);
        assert_eq!(view.poll_after_ms, Some(2_000));

        let err = order_status(&db, Uuid::new_v4(), 2_000).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }
}
