//! Supported currencies

use super::error::QuoteError;
use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrencyKind {
    Fiat,
    Crypto,
}

impl Display for CurrencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CurrencyKind::Fiat => "Fiat",
                CurrencyKind::Crypto => "Crypto",
            }
        )
    }
}

/// Ordered list of every currency the client offers for selection.
const REGISTRY: [(&str, CurrencyKind); 29] = [
    ("USD", CurrencyKind::Fiat),
    ("EUR", CurrencyKind::Fiat),
    ("GBP", CurrencyKind::Fiat),
    ("CAD", CurrencyKind::Fiat),
    ("AUD", CurrencyKind::Fiat),
    ("JPY", CurrencyKind::Fiat),
    ("MAD", CurrencyKind::Fiat),
    ("ZAR", CurrencyKind::Fiat),
    ("INR", CurrencyKind::Fiat),
    ("BRL", CurrencyKind::Fiat),
    ("TRY", CurrencyKind::Fiat),
    ("HUF", CurrencyKind::Fiat),
    ("MXN", CurrencyKind::Fiat),
    ("THB", CurrencyKind::Fiat),
    ("NGN", CurrencyKind::Fiat),
    ("COP", CurrencyKind::Fiat),
    ("PEN", CurrencyKind::Fiat),
    ("BTC", CurrencyKind::Crypto),
    ("ETH", CurrencyKind::Crypto),
    ("USDT", CurrencyKind::Crypto),
    ("BNB", CurrencyKind::Crypto),
    ("SOL", CurrencyKind::Crypto),
    ("ADA", CurrencyKind::Crypto),
    ("AVAX", CurrencyKind::Crypto),
    ("XMR", CurrencyKind::Crypto),
    ("MATIC", CurrencyKind::Crypto),
    ("TRX", CurrencyKind::Crypto),
    ("LTC", CurrencyKind::Crypto),
    ("NEAR", CurrencyKind::Crypto),
];

/// A currency code known to the registry. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn parse(code: &str) -> Result<Self, QuoteError> {
        if is_supported(code) {
            Ok(CurrencyCode(code.to_string()))
        } else {
            Err(QuoteError::UnknownCurrency(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> CurrencyKind {
        REGISTRY
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, kind)| *kind)
            .unwrap_or(CurrencyKind::Fiat)
    }
}

impl FromStr for CurrencyCode {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurrencyCode::parse(s)
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_supported(code: &str) -> bool {
    REGISTRY.iter().any(|(c, _)| *c == code)
}

/// Iterates the registry in display order.
pub fn all() -> impl Iterator<Item = (CurrencyCode, CurrencyKind)> {
    REGISTRY
        .iter()
        .map(|(code, kind)| (CurrencyCode(code.to_string()), *kind))
}
