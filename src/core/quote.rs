//! Quote service abstraction and response types

use super::error::QuoteError;
use super::request::ConversionRequest;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Result of a pre-quote: the direct, unoptimized amount only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteResult {
    pub direct_amount: f64,
}

/// Result of a full conversion.
///
/// All fields tolerate absence on the wire; the display layer substitutes a
/// placeholder for missing values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionResult {
    pub direct_amount: Option<f64>,
    pub converted_amount: Option<f64>,
    pub optimized_rate: Option<f64>,
    pub exchange_path: Option<Vec<String>>,
    pub savings: Option<f64>,
    pub commission: Option<f64>,
    pub arbitrage_profit: Option<f64>,
}

/// How strictly a convert response is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponsePolicy {
    /// Any JSON body is a success.
    #[default]
    Lenient,
    /// `direct_amount`, `converted_amount`, `savings` and `commission` must be present.
    Strict,
}

impl QuoteResult {
    pub fn from_json(body: &Value) -> Result<Self, QuoteError> {
        let direct_amount = number(body, "direct_amount").ok_or_else(|| {
            QuoteError::MalformedResponse(format!("missing numeric `direct_amount` in {body}"))
        })?;
        Ok(QuoteResult { direct_amount })
    }
}

impl ConversionResult {
    pub fn from_json(body: &Value, policy: ResponsePolicy) -> Result<Self, QuoteError> {
        let exchange_path = match body.get("exchange_path") {
            None | Some(Value::Null) => None,
            Some(path) => match currency_list(path) {
                Some(codes) => Some(codes),
                None if policy == ResponsePolicy::Strict => {
                    return Err(QuoteError::MalformedResponse(format!(
                        "`exchange_path` is not a list of currency codes: {path}"
                    )));
                }
                // Dropped whole, never partially
                None => None,
            },
        };

        let result = ConversionResult {
            direct_amount: number(body, "direct_amount"),
            converted_amount: number(body, "converted_amount"),
            optimized_rate: number(body, "optimized_rate"),
            exchange_path,
            savings: number(body, "savings"),
            commission: number(body, "commission"),
            arbitrage_profit: number(body, "arbitrage_profit"),
        };

        if policy == ResponsePolicy::Strict {
            let missing: Vec<&str> = [
                ("direct_amount", result.direct_amount),
                ("converted_amount", result.converted_amount),
                ("savings", result.savings),
                ("commission", result.commission),
            ]
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
            if !missing.is_empty() {
                return Err(QuoteError::MalformedResponse(format!(
                    "missing required fields: {}",
                    missing.join(", ")
                )));
            }
        }

        Ok(result)
    }

    /// True when the service reports a strictly positive arbitrage profit.
    pub fn has_arbitrage(&self) -> bool {
        self.arbitrage_profit.is_some_and(|p| p > 0.0)
    }
}

fn number(body: &Value, field: &str) -> Option<f64> {
    body.get(field).and_then(Value::as_f64)
}

/// All elements as strings, or `None` if any element is not a string.
fn currency_list(path: &Value) -> Option<Vec<String>> {
    path.as_array()?
        .iter()
        .map(|code| code.as_str().map(str::to_string))
        .collect()
}

#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn pre_quote(&self, request: &ConversionRequest) -> Result<QuoteResult, QuoteError>;
    async fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult, QuoteError>;
}
