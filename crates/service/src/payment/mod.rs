//! Payment gateway seam and callback handling.
//!
//! Cash on delivery never touches a gateway. Online payments open a session with
//! [`PaymentGateway::open_session`] after checkout commits, and the gateway later
//! reports back through [`callbacks::process_callback`].

pub mod sslcommerz;
pub mod mock;
pub mod callbacks;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;

pub use sslcommerz::SslCommerzGateway;

#[derive(Debug, Clone, Serialize)]
pub struct SessionRequest {
    pub order_id: Uuid,
    pub transaction_id: String,
    pub amount_cents: i64,
    pub currency: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: String,
    pub shipping_address: String,
    pub product_name: String,
    pub num_items: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySession {
    pub redirect_url: String,
    pub session_key: Option<String>,
}

/// What the gateway's validation API says about one `val_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub status: String,
    pub transaction_id: Option<String>,
    pub amount_cents: Option<i64>,
    pub val_id: Option<String>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn open_session(&self, req: &SessionRequest) -> Result<GatewaySession, ServiceError>;
    async fn validate(&self, val_id: &str) -> Result<ValidationReport, ServiceError>;
}

/// Minor units to the gateway's decimal string, e.g. `12345` -> `"123.45"`.
pub fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parses non-negative decimal amounts with at most two fractional digits.
pub fn parse_amount(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (whole, frac) = match raw.split_once('.') {
        Some((w, f)) => (w, f),
        None => (raw, ""),
    };
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // gateways sometimes pad to four places ("100.0000")
    let frac = frac.trim_end_matches('0');
    if frac.len() > 2 {
        return None;
    }
    let whole: i64 = whole.parse().ok()?;
    let frac_cents: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };
    whole.checked_mul(100)?.checked_add(frac_cents)
}

/// Unique per payment attempt; the gateway echoes it back in every callback.
pub fn new_transaction_id() -> String {
    format!("TXN-{}", Uuid::new_v4().simple().to_string().to_ascii_uppercase())
}
