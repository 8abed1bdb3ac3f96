//! Order placement.
//!
//! Everything that touches stock and money runs in one transaction. The gateway
//! session is opened only after commit so a slow gateway never holds row locks.

use std::collections::HashMap;

use chrono::Utc;
use models::status::{OrderStatus, PaymentMethod, PaymentStatus};
use models::{catalog_service, order, order_item, payment, product, validation};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::payment::{new_transaction_id, PaymentGateway, SessionRequest};

pub const MAX_LINES: usize = 50;
pub const MAX_QUANTITY: i32 = 99;

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutItem {
    #[serde(default)]
    pub product_id: Option<Uuid>,
    #[serde(default)]
    pub service_id: Option<Uuid>,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutInput {
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_email: Option<String>,
    pub shipping_address: String,
    #[serde(default)]
    pub note: Option<String>,
    pub payment_method: PaymentMethod,
    pub items: Vec<CheckoutItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResult {
    pub order_id: Uuid,
    pub order_number: String,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub transaction_id: String,
    /// Gateway checkout page; absent for cash on delivery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

enum LineRef {
    Product(Uuid),
    Service(Uuid),
}

struct Line {
    target: LineRef,
    quantity: i32,
}

fn validate_lines(items: &[CheckoutItem]) -> Result<Vec<Line>, ServiceError> {
    if items.is_empty() {
        return Err(ServiceError::Validation("order has no items".into()));
    }
    if items.len() > MAX_LINES {
        return Err(ServiceError::Validation(format!("at most {MAX_LINES} lines per order")));
    }
    items
        .iter()
        .map(|item| {
            if !(1..=MAX_QUANTITY).contains(&item.quantity) {
                return Err(ServiceError::Validation(format!("quantity must be 1..={MAX_QUANTITY}")));
            }
            let target = match (item.product_id, item.service_id) {
                (Some(p), None) => LineRef::Product(p),
                (None, Some(s)) => LineRef::Service(s),
                _ => return Err(ServiceError::Validation("each item needs exactly one of product_id or service_id".into())),
            };
            Ok(Line { target, quantity: item.quantity })
        })
        .collect()
}

fn overflow() -> ServiceError {
    ServiceError::Validation("order total out of range".into())
}

/// Places an order and, for online payment, opens a gateway session.
///
/// `gateway` may be `None` when no online gateway is configured; cash on
/// delivery works either way.
#[instrument(skip(db, gateway, input), fields(method = %input.payment_method, lines = input.items.len()))]
pub async fn place_order(
    db: &DatabaseConnection,
    gateway: Option<&dyn PaymentGateway>,
    currency: &str,
    input: CheckoutInput,
) -> Result<CheckoutResult, ServiceError> {
    let customer_name = validation::validate_name("customer_name", &input.customer_name)?;
    let customer_phone = validation::normalize_phone(&input.customer_phone)?;
    let shipping_address = validation::non_blank(Some(input.shipping_address))
        .ok_or_else(|| ServiceError::Validation("shipping_address required".into()))?;
    let customer_email = validation::non_blank(input.customer_email);
    if let Some(email) = &customer_email {
        validation::validate_email(email)?;
    }
    let note = validation::non_blank(input.note);
    let lines = validate_lines(&input.items)?;
    let gateway = match (input.payment_method, gateway) {
        (PaymentMethod::SslCommerz, None) => {
            return Err(ServiceError::Gateway("online payment is not configured".into()));
        }
        (PaymentMethod::SslCommerz, g) => g,
        (PaymentMethod::Cod, _) => None,
    };

    let order_id = Uuid::new_v4();
    let now = Utc::now();
    let order_number = order::order_number(order_id, now);
    let transaction_id = new_transaction_id();

    let txn = db.begin().await?;

    let product_ids: Vec<Uuid> = lines.iter().filter_map(|l| match l.target { LineRef::Product(id) => Some(id), _ => None }).collect();
    let service_ids: Vec<Uuid> = lines.iter().filter_map(|l| match l.target { LineRef::Service(id) => Some(id), _ => None }).collect();
    let products: HashMap<Uuid, product::Model> = if product_ids.is_empty() {
        HashMap::new()
    } else {
        product::Entity::find()
            .filter(product::Column::Id.is_in(product_ids))
            .filter(product::Column::IsActive.eq(true))
            .filter(product::Column::DeletedAt.is_null())
            .all(&txn)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect()
    };
    let services: HashMap<Uuid, catalog_service::Model> = if service_ids.is_empty() {
        HashMap::new()
    } else {
        catalog_service::Entity::find()
            .filter(catalog_service::Column::Id.is_in(service_ids))
            .filter(catalog_service::Column::IsActive.eq(true))
            .filter(catalog_service::Column::DeletedAt.is_null())
            .all(&txn)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect()
    };

    let mut total: i64 = 0;
    let mut items = Vec::with_capacity(lines.len());
    let mut names: Vec<String> = Vec::with_capacity(lines.len());
    for line in &lines {
        let (name, unit_price, product_id, service_id) = match line.target {
            LineRef::Product(id) => {
                let p = products.get(&id).ok_or_else(|| ServiceError::Validation(format!("product {id} is not available")))?;
                // Conditional decrement: concurrent checkouts can never push stock below zero.
                let res = product::Entity::update_many()
                    .col_expr(product::Column::Stock, Expr::col(product::Column::Stock).sub(line.quantity))
                    .filter(product::Column::Id.eq(id))
                    .filter(product::Column::Stock.gte(line.quantity))
                    .exec(&txn)
                    .await?;
                if res.rows_affected == 0 {
                    return Err(ServiceError::Conflict(format!("insufficient stock for {}", p.name)));
                }
                (p.name.clone(), p.price_cents, Some(id), None)
            }
            LineRef::Service(id) => {
                let s = services.get(&id).ok_or_else(|| ServiceError::Validation(format!("service {id} is not available")))?;
                (s.name.clone(), s.price_cents, None, Some(id))
            }
        };
        let line_total = unit_price.checked_mul(i64::from(line.quantity)).ok_or_else(overflow)?;
        total = total.checked_add(line_total).ok_or_else(overflow)?;
        names.push(name.clone());
        items.push(order_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            product_id: Set(product_id),
            service_id: Set(service_id),
            name: Set(name),
            unit_price_cents: Set(unit_price),
            quantity: Set(line.quantity),
            line_total_cents: Set(line_total),
        });
    }
    let product_name = match names.as_slice() {
        [] => order_number.clone(),
        [only] => only.clone(),
        [first, rest @ ..] => format!("{} and {} more", first, rest.len()),
    };
    let num_items = lines.iter().map(|l| l.quantity as u32).sum();

    order::ActiveModel {
        id: Set(order_id),
        order_number: Set(order_number.clone()),
        customer_name: Set(customer_name.clone()),
        customer_email: Set(customer_email.clone()),
        customer_phone: Set(customer_phone.clone()),
        shipping_address: Set(shipping_address.clone()),
        note: Set(note),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        payment_method: Set(input.payment_method.as_str().to_string()),
        total_cents: Set(total),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        deleted_at: Set(None),
    }
    .insert(&txn)
    .await?;
    order_item::Entity::insert_many(items).exec(&txn).await?;
    let payment_id = Uuid::new_v4();
    payment::ActiveModel {
        id: Set(payment_id),
        order_id: Set(order_id),
        method: Set(input.payment_method.as_str().to_string()),
        status: Set(PaymentStatus::Pending.as_str().to_string()),
        amount_cents: Set(total),
        transaction_id: Set(transaction_id.clone()),
        gateway_val_id: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;
    info!(event = "order_placed", order_id = %order_id, order_number = %order_number, total_cents = total);

    let mut result = CheckoutResult {
        order_id,
        order_number,
        total_cents: total,
        payment_method: input.payment_method,
        payment_status: PaymentStatus::Pending,
        transaction_id: transaction_id.clone(),
        redirect_url: None,
    };
    let Some(gateway) = gateway else { return Ok(result) };

    let req = SessionRequest {
        order_id,
        transaction_id,
        amount_cents: total,
        currency: currency.to_string(),
        customer_name,
        customer_email,
        customer_phone,
        shipping_address,
        product_name,
        num_items,
    };
    match gateway.open_session(&req).await {
        Ok(session) => {
            result.redirect_url = Some(session.redirect_url);
            Ok(result)
        }
        Err(e) => {
            error!(event = "gateway_session_failed", order_id = %order_id, error = %e);
            payment::Entity::update_many()
                .col_expr(payment::Column::Status, Expr::value(PaymentStatus::Failed.as_str()))
                .col_expr(payment::Column::UpdatedAt, Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(Utc::now())))
                .filter(payment::Column::Id.eq(payment_id))
                .exec(db)
                .await?;
            Err(e)
        }
    }
}
