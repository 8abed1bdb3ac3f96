//! Scriptable gateway for tests and local runs without gateway credentials.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{GatewaySession, PaymentGateway, SessionRequest, ValidationReport};
use crate::errors::ServiceError;

#[derive(Default)]
pub struct MockGateway {
    fail_sessions: bool,
    reports: Mutex<HashMap<String, ValidationReport>>,
    sessions: Mutex<Vec<SessionRequest>>,
}

impl MockGateway {
    pub fn new() -> Self { Self::default() }

    /// Every `open_session` call fails with a gateway error.
    pub fn failing() -> Self { Self { fail_sessions: true, ..Self::default() } }

    pub fn set_report(&self, val_id: &str, report: ValidationReport) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.insert(val_id.to_string(), report);
        }
    }

    /// Convenience for a valid report matching one payment.
    pub fn approve(&self, val_id: &str, transaction_id: &str, amount_cents: i64) {
        self.set_report(val_id, ValidationReport {
            valid: true,
            status: "VALID".into(),
            transaction_id: Some(transaction_id.to_string()),
            amount_cents: Some(amount_cents),
            val_id: Some(val_id.to_string()),
        });
    }

    pub fn sessions(&self) -> Vec<SessionRequest> {
        self.sessions.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn open_session(&self, req: &SessionRequest) -> Result<GatewaySession, ServiceError> {
        if self.fail_sessions {
            return Err(ServiceError::Gateway("mock gateway unavailable".into()));
        }
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.push(req.clone());
        }
        Ok(GatewaySession {
            redirect_url: format!("https://gateway.test/pay/{}", req.transaction_id),
            session_key: Some(format!("SESS-{}", req.transaction_id)),
        })
    }

    async fn validate(&self, val_id: &str) -> Result<ValidationReport, ServiceError> {
        let reports = self.reports.lock().map_err(|e| ServiceError::Gateway(e.to_string()))?;
        Ok(reports.get(val_id).cloned().unwrap_or_else(|| ValidationReport {
            valid: false,
            status: "INVALID_TRANSACTION".into(),
            ..ValidationReport::default()
        }))
    }
}
