use std::time::Duration;

use async_trait::async_trait;
use configs::SslCommerzConfig;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info, instrument};

use super::{format_amount, parse_amount, GatewaySession, PaymentGateway, SessionRequest, ValidationReport};
use crate::errors::ServiceError;

/// Callback routes this server exposes, relative to `callback_base_url`.
pub const SUCCESS_PATH: &str = "/api/payment/sslcommerz/success";
pub const FAIL_PATH: &str = "/api/payment/sslcommerz/fail";
pub const CANCEL_PATH: &str = "/api/payment/sslcommerz/cancel";
pub const IPN_PATH: &str = "/api/payment/sslcommerz/ipn";

#[derive(Debug, Deserialize)]
struct SessionResponse {
    status: String,
    #[serde(default)]
    failedreason: Option<String>,
    #[serde(default)]
    sessionkey: Option<String>,
    #[serde(default, rename = "GatewayPageURL")]
    gateway_page_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValidatorResponse {
    status: String,
    #[serde(default)]
    tran_id: Option<String>,
    #[serde(default)]
    val_id: Option<String>,
    #[serde(default)]
    amount: Option<String>,
}

/// SSLCommerz hosted checkout (v4 session API plus the validation server API).
pub struct SslCommerzGateway {
    http: Client,
    api_base: String,
    store_id: String,
    store_password: String,
    callback_base_url: String,
}

impl SslCommerzGateway {
    pub fn new(cfg: &SslCommerzConfig) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| ServiceError::Gateway(e.to_string()))?;
        Ok(Self::with_client(http, cfg.api_base().to_string(), cfg))
    }

    /// Overrides the API host, e.g. to point at a local stub.
    pub fn with_client(http: Client, api_base: String, cfg: &SslCommerzConfig) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            store_id: cfg.store_id.clone(),
            store_password: cfg.store_password.clone(),
            callback_base_url: cfg.callback_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn callback(&self, path: &str) -> String {
        format!("{}{}", self.callback_base_url, path)
    }
}

#[async_trait]
impl PaymentGateway for SslCommerzGateway {
    #[instrument(skip(self, req), fields(tran_id = %req.transaction_id, amount_cents = req.amount_cents))]
    async fn open_session(&self, req: &SessionRequest) -> Result<GatewaySession, ServiceError> {
        let total = format_amount(req.amount_cents);
        let num_items = req.num_items.to_string();
        let success_url = self.callback(SUCCESS_PATH);
        let fail_url = self.callback(FAIL_PATH);
        let cancel_url = self.callback(CANCEL_PATH);
        let ipn_url = self.callback(IPN_PATH);
        let order_id = req.order_id.to_string();
        let form: Vec<(&str, &str)> = vec![
            ("store_id", self.store_id.as_str()),
            ("store_passwd", self.store_password.as_str()),
            ("total_amount", total.as_str()),
            ("currency", req.currency.as_str()),
            ("tran_id", req.transaction_id.as_str()),
            ("success_url", success_url.as_str()),
            ("fail_url", fail_url.as_str()),
            ("cancel_url", cancel_url.as_str()),
            ("ipn_url", ipn_url.as_str()),
            ("cus_name", req.customer_name.as_str()),
            ("cus_email", req.customer_email.as_deref().unwrap_or("none@example.com")),
            ("cus_phone", req.customer_phone.as_str()),
            ("cus_add1", req.shipping_address.as_str()),
            ("cus_country", "Bangladesh"),
            ("shipping_method", "NO"),
            ("num_of_item", num_items.as_str()),
            ("product_name", req.product_name.as_str()),
            ("product_category", "general"),
            ("product_profile", "general"),
            ("value_a", order_id.as_str()),
        ];

        let resp = self
            .http
            .post(format!("{}/gwprocess/v4/api.php", self.api_base))
            .form(&form)
            .send()
            .await
            .map_err(|e| ServiceError::Gateway(format!("session request failed: {e}")))?;
        let http_status = resp.status();
        if !http_status.is_success() {
            error!(event = "gateway_session_http_error", status = %http_status);
            return Err(ServiceError::Gateway(format!("session request returned {http_status}")));
        }
        let body: SessionResponse = resp
            .json()
            .await
            .map_err(|e| ServiceError::Gateway(format!("invalid session response: {e}")))?;

        match (body.status.eq_ignore_ascii_case("SUCCESS"), body.gateway_page_url) {
            (true, Some(url)) if !url.is_empty() => {
                info!(event = "gateway_session_opened");
                Ok(GatewaySession { redirect_url: url, session_key: body.sessionkey })
            }
            _ => {
                let reason = body.failedreason.unwrap_or_else(|| body.status.clone());
                error!(event = "gateway_session_rejected", reason = %reason);
                Err(ServiceError::Gateway(format!("session rejected: {reason}")))
            }
        }
    }

    #[instrument(skip(self))]
    async fn validate(&self, val_id: &str) -> Result<ValidationReport, ServiceError> {
        let resp = self
            .http
            .get(format!("{}/validator/api/validationserverAPI.php", self.api_base))
            .query(&[
                ("val_id", val_id),
                ("store_id", self.store_id.as_str()),
                ("store_passwd", self.store_password.as_str()),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::Gateway(format!("validation request failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(ServiceError::Gateway(format!("validation request returned {}", resp.status())));
        }
        let body: ValidatorResponse = resp
            .json()
            .await
            .map_err(|e| ServiceError::Gateway(format!("invalid validation response: {e}")))?;

        let status = body.status.to_ascii_uppercase();
        Ok(ValidationReport {
            valid: status == "VALID" || status == "VALIDATED",
            status,
            transaction_id: body.tran_id,
            amount_cents: body.amount.as_deref().and_then(parse_amount),
            val_id: body.val_id,
        })
    }
}
