//! Turns raw user input into a conversion request

use super::currency::CurrencyCode;
use super::error::QuoteError;
use serde::Serialize;

/// Payload sent to both quote endpoints.
///
/// The amount is not checked on construction: zero, negative and NaN values
/// are all forwarded as entered. NaN serializes as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionRequest {
    pub amount: f64,
    #[serde(rename = "from_currency")]
    pub from: CurrencyCode,
    #[serde(rename = "to_currency")]
    pub to: CurrencyCode,
}

impl ConversionRequest {
    /// Rejects amounts that are not finite or are negative.
    pub fn validate(&self) -> Result<(), QuoteError> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(QuoteError::InvalidAmount(self.amount));
        }
        Ok(())
    }
}

pub fn build(raw_amount: &str, from: CurrencyCode, to: CurrencyCode) -> ConversionRequest {
    let amount = raw_amount.trim().parse::<f64>().unwrap_or(f64::NAN);
    ConversionRequest { amount, from, to }
}
