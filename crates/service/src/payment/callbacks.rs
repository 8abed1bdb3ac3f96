//! Gateway callbacks (success / fail / cancel redirects and the IPN post).
//!
//! All four endpoints funnel into [`process_callback`]. Processing is idempotent:
//! a `paid` payment is never touched again and repeating a callback changes nothing.

use chrono::Utc;
use models::status::{OrderStatus, PaymentStatus};
use models::{order, payment};
use sea_orm::sea_query::Expr;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{parse_amount, PaymentGateway};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    Success,
    Fail,
    Cancel,
    Ipn,
}

/// Form fields posted by the gateway; anything else it sends is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackForm {
    pub tran_id: String,
    #[serde(default)]
    pub val_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallbackOutcome {
    pub order_id: Uuid,
    pub payment_status: PaymentStatus,
    pub changed: bool,
}

enum Verdict {
    Paid(String),
    Failed,
    Cancelled,
    Ignore,
}

#[instrument(skip(db, gateway, form), fields(kind = ?kind, tran_id = %form.tran_id))]
pub async fn process_callback(
    db: &DatabaseConnection,
    gateway: &dyn PaymentGateway,
    kind: CallbackKind,
    form: CallbackForm,
) -> Result<CallbackOutcome, ServiceError> {
    let pay = payment::Entity::find()
        .filter(payment::Column::TransactionId.eq(form.tran_id.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("payment"))?;
    let current: PaymentStatus = pay.status.parse()?;
    if current == PaymentStatus::Paid {
        return Ok(CallbackOutcome { order_id: pay.order_id, payment_status: current, changed: false });
    }

    let reported = form.status.as_deref().map(|s| s.trim().to_ascii_uppercase());
    let verdict = match reported.as_deref() {
        Some("VALID") | Some("VALIDATED") => match form.val_id.as_deref().filter(|v| !v.is_empty()) {
            None => Verdict::Failed,
            Some(val_id) => {
                let report = gateway.validate(val_id).await?;
                let amount_ok = report.amount_cents == Some(pay.amount_cents);
                let tran_ok = report.transaction_id.as_deref() == Some(pay.transaction_id.as_str());
                if report.valid && amount_ok && tran_ok {
                    Verdict::Paid(val_id.to_string())
                } else {
                    warn!(
                        event = "payment_validation_mismatch",
                        status = %report.status,
                        amount_ok,
                        tran_ok,
                        posted_amount = ?form.amount.as_deref().and_then(parse_amount),
                        "gateway did not confirm the payment"
                    );
                    Verdict::Failed
                }
            }
        },
        Some("FAILED") => Verdict::Failed,
        Some("CANCELLED") => Verdict::Cancelled,
        _ => match kind {
            CallbackKind::Fail => Verdict::Failed,
            CallbackKind::Cancel => Verdict::Cancelled,
            CallbackKind::Success | CallbackKind::Ipn => Verdict::Ignore,
        },
    };

    let (next, val_id) = match verdict {
        Verdict::Paid(v) => (PaymentStatus::Paid, Some(v)),
        Verdict::Failed => (PaymentStatus::Failed, None),
        Verdict::Cancelled => (PaymentStatus::Cancelled, None),
        Verdict::Ignore => {
            info!(event = "payment_callback_ignored", status = ?reported);
            return Ok(CallbackOutcome { order_id: pay.order_id, payment_status: current, changed: false });
        }
    };
    // only a verified payment may leave failed/cancelled again
    if next == current || (current != PaymentStatus::Pending && next != PaymentStatus::Paid) {
        return Ok(CallbackOutcome { order_id: pay.order_id, payment_status: current, changed: false });
    }

    let now = DateTimeWithTimeZone::from(Utc::now());
    let txn = db.begin().await?;
    let mut update = payment::Entity::update_many()
        .col_expr(payment::Column::Status, Expr::value(next.as_str()))
        .col_expr(payment::Column::UpdatedAt, Expr::value(now));
    if let Some(v) = &val_id {
        update = update.col_expr(payment::Column::GatewayValId, Expr::value(v.clone()));
    }
    let res = update
        .filter(payment::Column::Id.eq(pay.id))
        .filter(payment::Column::Status.ne(PaymentStatus::Paid.as_str()))
        .exec(&txn)
        .await?;
    if res.rows_affected == 0 {
        // a concurrent callback settled it first
        txn.commit().await?;
        return Ok(CallbackOutcome { order_id: pay.order_id, payment_status: PaymentStatus::Paid, changed: false });
    }
    if next == PaymentStatus::Paid {
        order::Entity::update_many()
            .col_expr(order::Column::Status, Expr::value(OrderStatus::Confirmed.as_str()))
            .col_expr(order::Column::UpdatedAt, Expr::value(now))
            .filter(order::Column::Id.eq(pay.order_id))
            .filter(order::Column::Status.eq(OrderStatus::Pending.as_str()))
            .exec(&txn)
            .await?;
    }
    txn.commit().await?;
    info!(event = "payment_settled", order_id = %pay.order_id, from = %current, to = %next);
    Ok(CallbackOutcome { order_id: pay.order_id, payment_status: next, changed: true })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::checkout::{place_order, CheckoutInput, CheckoutItem, CheckoutResult};
    use crate::payment::mock::MockGateway;
    use crate::test_support::{get_db, seed_product};
    use models::status::PaymentMethod;

    async fn online_order(db: &DatabaseConnection, gateway: &MockGateway) -> anyhow::Result<CheckoutResult> {
        let p = seed_product(db, "Blender", 4_550, 3).await?;
        Ok(place_order(db, Some(gateway), "BDT", CheckoutInput {
            customer_name: "Nadia".into(),
            customer_phone: "01811111111".into(),
            customer_email: None,
            shipping_address: "Banani, Dhaka".into(),
            note: None,
            payment_method: PaymentMethod::SslCommerz,
            items: vec![CheckoutItem { product_id: Some(p.id), service_id: None, quantity: 1 }],
        })
        .await?)
    }

    fn form(tran_id: &str, status: &str, val_id: Option<&str>) -> CallbackForm {
        CallbackForm { tran_id: tran_id.into(), val_id: val_id.map(Into::into), status: Some(status.into()), amount: Some("45.50".into()) }
    }

    async fn statuses(db: &DatabaseConnection, order_id: Uuid) -> anyhow::Result<(String, String)> {
        let o = order::Entity::find_by_id(order_id).one(db).await?.expect("order");
        let p = payment::Entity::find().filter(payment::Column::OrderId.eq(order_id)).one(db).await?.expect("payment");
        Ok((o.status, p.status))
    }

    #[tokio::test]
    async fn validated_success_confirms_order_once() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let gateway = MockGateway::new();
        let placed = online_order(&db, &gateway).await?;
        gateway.approve("VAL-1", &placed.transaction_id, placed.total_cents);

        let out = process_callback(&db, &gateway, CallbackKind::Success, form(&placed.transaction_id, "VALID", Some("VAL-1"))).await?;
        assert!(out.changed);
        assert_eq!(out.payment_status, PaymentStatus::Paid);
        assert_eq!(statuses(&db, placed.order_id).await?, ("confirmed".into(), "paid".into()));

        // repeated IPN and a late failure are both no-ops
        let again = process_callback(&db, &gateway, CallbackKind::Ipn, form(&placed.transaction_id, "VALID", Some("VAL-1"))).await?;
        assert!(!again.changed);
        let late = process_callback(&db, &gateway, CallbackKind::Fail, form(&placed.transaction_id, "FAILED", None)).await?;
        assert!(!late.changed);
        assert_eq!(statuses(&db, placed.order_id).await?, ("confirmed".into(), "paid".into()));
        Ok(())
    }

    #[tokio::test]
    async fn amount_mismatch_fails_payment() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let gateway = MockGateway::new();
        let placed = online_order(&db, &gateway).await?;
        gateway.approve("VAL-2", &placed.transaction_id, placed.total_cents - 1);

        let out = process_callback(&db, &gateway, CallbackKind::Success, form(&placed.transaction_id, "VALID", Some("VAL-2"))).await?;
        assert_eq!(out.payment_status, PaymentStatus::Failed);
        assert_eq!(statuses(&db, placed.order_id).await?, ("pending".into(), "failed".into()));
        Ok(())
    }

    #[tokio::test]
    async fn cancel_and_unknown_transactions() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let gateway = MockGateway::new();
        let placed = online_order(&db, &gateway).await?;

        let out = process_callback(&db, &gateway, CallbackKind::Cancel, form(&placed.transaction_id, "CANCELLED", None)).await?;
        assert_eq!(out.payment_status, PaymentStatus::Cancelled);
        assert_eq!(statuses(&db, placed.order_id).await?, ("pending".into(), "cancelled".into()));

        let err = process_callback(&db, &gateway, CallbackKind::Ipn, form("TXN-UNKNOWN", "VALID", Some("x"))).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }
}
