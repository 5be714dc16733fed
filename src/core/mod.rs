//! Core quote abstractions and session logic

pub mod config;
pub mod currency;
pub mod error;
pub mod log;
pub mod quote;
pub mod request;
pub mod session;
pub mod view;

// Re-export main types for cleaner imports
pub use currency::{CurrencyCode, CurrencyKind};
pub use error::QuoteError;
pub use quote::{ConversionResult, QuoteResult, QuoteService, ResponsePolicy};
pub use request::ConversionRequest;
pub use session::{ErrorReporter, LogReporter, Mode, Operation, Session, SessionState};
