//! Error taxonomy for quote requests

use thiserror::Error;

/// Errors produced while building, sending or interpreting a quote request.
///
/// Every failure of a quote call ends up as one of these values; none of them
/// is fatal and the caller can always retry.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// The amount is not a finite, non-negative number.
    /// Only raised when amount validation is enabled.
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    /// The currency code is not part of the supported registry.
    #[error("Unsupported currency: {0}")]
    UnknownCurrency(String),

    /// The service answered with JSON that lacks a required field.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Connection failure, timeout, non-2xx status or a body that is not JSON.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Another quote request is still in flight on this session.
    #[error("A quote request is already in progress")]
    Busy,
}

impl QuoteError {
    pub fn is_busy(&self) -> bool {
        matches!(self, QuoteError::Busy)
    }
}
