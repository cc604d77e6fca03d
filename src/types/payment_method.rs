//! Payment method types.

use serde::Deserialize;

/// Payment method information.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaymentMethod {
    /// Payment method ID (e.g. `visa`).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Payment type (`credit_card`, `ticket`, `bank_transfer`...).
    pub payment_type_id: String,

    /// Availability (`active` or `deactive`).
    pub status: String,

    /// Secure thumbnail URL.
    pub secure_thumbnail: Option<String>,

    /// Thumbnail URL.
    pub thumbnail: Option<String>,

    /// Whether capture can be deferred.
    pub deferred_capture: Option<String>,

    /// Minimum amount accepted.
    pub min_allowed_amount: Option<f64>,

    /// Maximum amount accepted.
    pub max_allowed_amount: Option<f64>,

    /// Minutes until the payment is accredited.
    pub accreditation_time: Option<u64>,

    /// Additional fields the payer must provide.
    pub additional_info_needed: Vec<String>,
}

impl PaymentMethod {
    /// Returns true if the method is currently available.
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    /// Returns true if `amount` is within the accepted bounds.
    pub fn accepts_amount(&self, amount: f64) -> bool {
        self.min_allowed_amount.map_or(true, |min| amount >= min)
            && self.max_allowed_amount.map_or(true, |max| amount <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_deserialization() {
        let method: PaymentMethod = serde_json::from_str(
            r#"{"id":"visa","name":"Visa","payment_type_id":"credit_card","status":"active",
                "min_allowed_amount":0.5,"max_allowed_amount":60000,"unknown_field":1}"#,
        )
        .unwrap();

        assert_eq!(method.id, "visa");
        assert!(method.is_active());
        assert!(method.accepts_amount(100.0));
        assert!(!method.accepts_amount(0.1));
        assert!(method.additional_info_needed.is_empty());
    }
}
