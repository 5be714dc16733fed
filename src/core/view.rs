//! Display model for quote results
//!
//! Converts session state into labelled, fully formatted rows. Absent values
//! are replaced by [`PLACEHOLDER`]; nothing here can fail.

use super::quote::{ConversionResult, QuoteResult};
use super::request::ConversionRequest;
use super::session::SessionState;

pub const PLACEHOLDER: &str = "N/A";
pub const PATH_SEPARATOR: &str = " → ";
/// Pivot currency of the unoptimized route.
pub const DIRECT_PATH_PIVOT: &str = "USD";

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewView {
    pub pre_quoted_amount: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionView {
    pub rows: Vec<Row>,
    /// Present only when the arbitrage profit is strictly positive.
    pub arbitrage: Option<String>,
}

impl ConversionView {
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuoteView {
    Empty,
    Preview(PreviewView),
    Conversion(ConversionView),
}

pub fn format_number(value: f64) -> String {
    value.to_string()
}

fn or_placeholder(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), format_number)
}

fn with_currency(value: Option<f64>, currency: &str) -> String {
    value.map_or_else(
        || PLACEHOLDER.to_string(),
        |v| format!("{} {currency}", format_number(v)),
    )
}

pub fn format_path(path: Option<&[String]>) -> String {
    match path {
        Some(codes) if !codes.is_empty() => codes.join(PATH_SEPARATOR),
        _ => PLACEHOLDER.to_string(),
    }
}

pub fn preview_view(result: &QuoteResult, request: &ConversionRequest) -> PreviewView {
    PreviewView {
        pre_quoted_amount: format!("{} {}", format_number(result.direct_amount), request.to),
    }
}

pub fn conversion_view(result: &ConversionResult, request: &ConversionRequest) -> ConversionView {
    let from = request.from.as_str();
    let to = request.to.as_str();

    // A zero rate carries no information, show the placeholder instead
    let optimized_rate = or_placeholder(result.optimized_rate.filter(|rate| *rate != 0.0));

    let rows = vec![
        Row {
            label: "Amount Sent",
            value: format!("{} {from}", format_number(request.amount)),
        },
        Row {
            label: "Direct Rate Amount",
            value: with_currency(result.direct_amount, to),
        },
        Row {
            label: "Actual Amount (Optimized)",
            value: with_currency(result.converted_amount, to),
        },
        Row {
            label: "Optimized Exchange Rate",
            value: optimized_rate,
        },
        Row {
            label: "Direct Path",
            value: [from, DIRECT_PATH_PIVOT, to].join(PATH_SEPARATOR),
        },
        Row {
            label: "Full Optimized Path",
            value: format_path(result.exchange_path.as_deref()),
        },
        Row {
            label: "Savings",
            value: or_placeholder(result.savings),
        },
        Row {
            label: "Commission",
            value: or_placeholder(result.commission),
        },
    ];

    let arbitrage = result
        .arbitrage_profit
        .filter(|_| result.has_arbitrage())
        .map(|profit| format!("{} {to}", format_number(profit)));

    ConversionView { rows, arbitrage }
}

/// Picks whichever result the session currently holds.
pub fn session_view(state: &SessionState) -> QuoteView {
    match (&state.last_request, &state.last_preview, &state.last_conversion) {
        (Some(request), Some(preview), _) => QuoteView::Preview(preview_view(preview, request)),
        (Some(request), _, Some(conversion)) => {
            QuoteView::Conversion(conversion_view(conversion, request))
        }
        _ => QuoteView::Empty,
    }
}
