//! Payment order creation for bookings.

use crate::error::PaymentError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Currency of booking payments.
pub const PAYMENT_CURRENCY: &str = "INR";

/// Maximum receipt length accepted by the gateway.
pub const MAX_RECEIPT_LEN: usize = 40;

/// An order to be created with the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Amount in minor units (paise).
    pub amount: u64,
    /// ISO currency code.
    pub currency: String,
    /// Merchant receipt id.
    pub receipt: String,
    /// Free-form annotations.
    pub notes: BTreeMap<String, String>,
}

/// A created order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOrder {
    /// Gateway order id.
    pub id: String,
    /// Amount in minor units.
    pub amount: u64,
    /// ISO currency code.
    pub currency: String,
}

/// Creates payment orders the client then completes in its payment UI.
#[async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    /// Public key the client needs to open the payment UI.
    fn public_key(&self) -> Option<String>;

    /// Creates an order.
    async fn create_order(&self, request: OrderRequest) -> Result<PaymentOrder, PaymentError>;
}

/// Builds the merchant receipt: `flt_` + first six characters of the user id
/// + flight number + unix seconds, cut to [`MAX_RECEIPT_LEN`] characters.
#[must_use]
pub fn receipt_id(user_id: &str, flightno: &str, unix_secs: i64) -> String {
    let short_user: String = user_id.chars().take(6).collect();
    format!("flt_{short_user}{flightno}{unix_secs}")
        .chars()
        .take(MAX_RECEIPT_LEN)
        .collect()
}

/// Converts a major-unit price into minor units, rounding to the nearest unit.
///
/// Returns `None` for negative or non-finite prices.
#[must_use]
pub fn to_minor_units(price: f64) -> Option<u64> {
    if !price.is_finite() || price < 0.0 {
        return None;
    }
    Some((price * 100.0).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_is_truncated_to_forty_chars() {
        let receipt = receipt_id("60b8d295f7f6d632d8b53cd4", "AI-2024-LONGFLIGHTNUMBER", 1_760_000_000);
        assert_eq!(receipt.chars().count(), MAX_RECEIPT_LEN);
        assert!(receipt.starts_with("flt_60b8d2AI-2024"));
    }

    #[test]
    fn short_receipt_is_untouched() {
        assert_eq!(receipt_id("u1", "6E501", 1_700_000_000), "flt_u16E5011700000000");
    }

    #[test]
    fn minor_units_round() {
        assert_eq!(to_minor_units(4599.29), Some(459_929));
        assert_eq!(to_minor_units(0.0), Some(0));
        assert_eq!(to_minor_units(-1.0), None);
        assert_eq!(to_minor_units(f64::NAN), None);
    }
}
