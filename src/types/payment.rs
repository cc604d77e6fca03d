//! Payment types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Payment creation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PaymentRequest {
    /// Amount to charge.
    pub transaction_amount: f64,

    /// Payment method identifier (e.g. `visa`, `pix`).
    pub payment_method_id: String,

    /// Payer information.
    pub payer: PayerRequest,

    /// Description shown to the payer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Card token, for card payments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Number of installments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installments: Option<u32>,

    /// Card issuer identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_id: Option<String>,

    /// Merchant reference for reconciliation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,

    /// URL notified on status changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_url: Option<String>,

    /// Whether to capture immediately (`false` only authorizes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture: Option<bool>,

    /// Free-form metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl PaymentRequest {
    /// Creates a request for `amount` paid with `payment_method_id` by `email`.
    pub fn new(
        amount: f64,
        payment_method_id: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            transaction_amount: amount,
            payment_method_id: payment_method_id.into(),
            payer: PayerRequest {
                email: email.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the card token and installments.
    pub fn card(mut self, token: impl Into<String>, installments: u32) -> Self {
        self.token = Some(token.into());
        self.installments = Some(installments);
        self
    }

    /// Sets the external reference.
    pub fn external_reference(mut self, reference: impl Into<String>) -> Self {
        self.external_reference = Some(reference.into());
        self
    }

    /// Authorizes without capturing.
    pub fn authorize_only(mut self) -> Self {
        self.capture = Some(false);
        self
    }
}

/// Payer information sent on creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayerRequest {
    /// Payer email.
    pub email: String,

    /// Payer first name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Payer last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Payer document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification: Option<Identification>,
}

/// Identity document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identification {
    /// Document type (e.g. `CPF`).
    #[serde(rename = "type")]
    pub kind: String,

    /// Document number.
    pub number: String,
}

/// Payer as returned by the API.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Payer {
    /// Payer ID.
    #[serde(default)]
    pub id: Option<String>,

    /// Payer email.
    #[serde(default)]
    pub email: Option<String>,

    /// Payer document.
    #[serde(default)]
    pub identification: Option<Identification>,
}

/// Payment as returned by the API.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaymentResponse {
    /// Payment ID.
    pub id: i64,

    /// Payment status (`pending`, `approved`, `cancelled`...).
    pub status: String,

    /// Detail of the status.
    pub status_detail: String,

    /// Description.
    pub description: Option<String>,

    /// Payment method identifier.
    pub payment_method_id: String,

    /// Payment type (`credit_card`, `bank_transfer`...).
    pub payment_type_id: String,

    /// ISO 4217 currency code.
    pub currency_id: String,

    /// Charged amount.
    pub transaction_amount: f64,

    /// Whether the amount was captured.
    pub captured: bool,

    /// Merchant reference.
    pub external_reference: Option<String>,

    /// Creation timestamp.
    pub date_created: Option<String>,

    /// Approval timestamp.
    pub date_approved: Option<String>,

    /// Last update timestamp.
    pub date_last_updated: Option<String>,

    /// Payer.
    pub payer: Option<Payer>,

    /// Free-form metadata.
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl PaymentResponse {
    /// Returns true if the payment was approved.
    pub fn is_approved(&self) -> bool {
        self.status == "approved"
    }
}

/// Search filters for `GET /v1/payments/search`. Empty fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Field to sort by (e.g. `date_created`).
    pub sort: String,
    /// Sort direction (`asc` or `desc`).
    pub criteria: String,
    /// Merchant reference.
    pub external_reference: String,
    /// Date field the range applies to.
    pub range: String,
    /// Range start.
    pub begin_date: String,
    /// Range end.
    pub end_date: String,
}

impl SearchFilters {
    /// Creates empty filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets sort field and direction.
    pub fn sort(mut self, field: impl Into<String>, criteria: impl Into<String>) -> Self {
        self.sort = field.into();
        self.criteria = criteria.into();
        self
    }

    /// Sets the external reference.
    pub fn external_reference(mut self, reference: impl Into<String>) -> Self {
        self.external_reference = reference.into();
        self
    }

    /// Restricts `range` to dates between `begin` and `end`.
    pub fn date_range(
        mut self,
        range: impl Into<String>,
        begin: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.range = range.into();
        self.begin_date = begin.into();
        self.end_date = end.into();
        self
    }

    /// Returns the non-empty filters as query pairs.
    pub fn to_query(&self) -> Vec<(&'static str, &str)> {
        [
            ("sort", self.sort.as_str()),
            ("criteria", self.criteria.as_str()),
            ("external_reference", self.external_reference.as_str()),
            ("range", self.range.as_str()),
            ("begin_date", self.begin_date.as_str()),
            ("end_date", self.end_date.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

/// Paging information of a search.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Paging {
    /// Total number of matches.
    pub total: u64,
    /// Page size.
    pub limit: u64,
    /// Page offset.
    pub offset: u64,
}

/// Search result page.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchResponse {
    /// Paging information.
    pub paging: Paging,
    /// Matching payments.
    pub results: Vec<PaymentResponse>,
}

impl SearchResponse {
    /// Returns the number of payments on this page.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if the page is empty.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Body of a cancellation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CancelRequest {
    /// Always `cancelled`.
    pub status: &'static str,
}

impl Default for CancelRequest {
    fn default() -> Self {
        Self { status: "cancelled" }
    }
}

/// Body of a capture.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CaptureRequest {
    /// Amount to capture; the full amount when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_amount: Option<f64>,
    /// Always `true`.
    pub capture: bool,
}

impl CaptureRequest {
    /// Captures the full authorized amount.
    pub fn full() -> Self {
        Self {
            transaction_amount: None,
            capture: true,
        }
    }

    /// Captures `amount`.
    pub fn amount(amount: f64) -> Self {
        Self {
            transaction_amount: Some(amount),
            capture: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_request_serialization_skips_unset_fields() {
        let request = PaymentRequest::new(150.0, "pix", "buyer@example.com").description("Order 1");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "transaction_amount": 150.0,
                "payment_method_id": "pix",
                "payer": {"email": "buyer@example.com"},
                "description": "Order 1"
            })
        );
    }

    #[test]
    fn test_payment_response_tolerates_missing_fields() {
        let payment: PaymentResponse = serde_json::from_str(r#"{"id":42}"#).unwrap();
        assert_eq!(payment.id, 42);
        assert!(payment.status.is_empty());
        assert!(!payment.is_approved());
    }

    #[test]
    fn test_search_filters_query_skips_empty() {
        let filters = SearchFilters::new()
            .sort("date_created", "desc")
            .external_reference("order-9");

        assert_eq!(
            filters.to_query(),
            vec![
                ("sort", "date_created"),
                ("criteria", "desc"),
                ("external_reference", "order-9"),
            ]
        );
        assert!(SearchFilters::new().to_query().is_empty());
    }

    #[test]
    fn test_capture_and_cancel_bodies() {
        assert_eq!(
            serde_json::to_value(CancelRequest::default()).unwrap(),
            json!({"status": "cancelled"})
        );
        assert_eq!(
            serde_json::to_value(CaptureRequest::full()).unwrap(),
            json!({"capture": true})
        );
        assert_eq!(
            serde_json::to_value(CaptureRequest::amount(12.5)).unwrap(),
            json!({"transaction_amount": 12.5, "capture": true})
        );
    }
}
