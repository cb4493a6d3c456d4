//! Optional parameters for payment endpoints.
//!
//! Setters apply in call order and later calls win. Values are passed to the
//! API as given; there is no client-side validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Request payload for `POST /wallet/up`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    /// Decimal amount in PLN, e.g. `"10.00"`.
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

impl CreatePayment {
    pub fn new(amount: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            redirect_url: None,
            webhook_url: None,
        }
    }

    /// Where the payer lands after completing the payment.
    pub fn with_redirect(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = Some(url.into());
        self
    }

    /// URL that receives a POST once the payment completes.
    pub fn with_webhook(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }
}

/// Paging filter for `GET /payments`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListPayments {
    pub limit: Option<i64>,
    pub before_id: Option<i64>,
    pub after_id: Option<i64>,
}

impl ListPayments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_before_id(mut self, before_id: i64) -> Self {
        self.before_id = Some(before_id);
        self
    }

    pub fn with_after_id(mut self, after_id: i64) -> Self {
        self.after_id = Some(after_id);
        self
    }

    /// Query parameters for the set fields only.
    pub fn to_query(&self) -> BTreeMap<String, String> {
        [
            ("limit", self.limit),
            ("beforeId", self.before_id),
            ("afterId", self.after_id),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key.to_string(), value.to_string())))
        .collect()
    }
}
