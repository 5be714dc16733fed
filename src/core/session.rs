//! Quote session state machine
//!
//! A session owns the results of the last preview or conversion and makes sure
//! only one quote request is in flight at a time. A request issued while
//! another is loading is rejected with [`QuoteError::Busy`]. Dropping a
//! request future before it completes puts the session back to Idle.
//!
//! State lives in a `watch` channel so that presentation code can observe
//! every transition without holding a lock across the network call.

use super::error::QuoteError;
use super::quote::{ConversionResult, QuoteResult, QuoteService};
use super::request::ConversionRequest;
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Preview,
    Conversion,
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Operation::Preview => "pre-quote",
                Operation::Conversion => "conversion",
            }
        )
    }
}

/// Snapshot of a session.
///
/// `last_preview` and `last_conversion` are never both set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub mode: Mode,
    pub in_flight: Option<Operation>,
    pub last_preview: Option<QuoteResult>,
    pub last_conversion: Option<ConversionResult>,
    /// Request that produced the displayed result.
    pub last_request: Option<ConversionRequest>,
}

/// Receives quote failures on behalf of the user.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, operation: Operation, error: &QuoteError);
}

/// Sends failures to the tracing log.
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, operation: Operation, err: &QuoteError) {
        error!(%operation, error = %err, "Quote request failed");
    }
}

/// Returns the session to Idle if a request future is dropped before `finish`.
struct InFlight<'a> {
    state: &'a watch::Sender<SessionState>,
    operation: Operation,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        debug!(operation = %self.operation, "Request dropped before completion");
        self.state.send_modify(|state| {
            state.mode = Mode::Idle;
            state.in_flight = None;
        });
    }
}

pub struct Session {
    service: Arc<dyn QuoteService>,
    reporter: Arc<dyn ErrorReporter>,
    validate_amounts: bool,
    state: watch::Sender<SessionState>,
}

impl Session {
    pub fn new(service: Arc<dyn QuoteService>, reporter: Arc<dyn ErrorReporter>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Session {
            service,
            reporter,
            validate_amounts: false,
            state,
        }
    }

    /// Reject non-finite or negative amounts before any request is sent.
    pub fn with_amount_validation(mut self, enabled: bool) -> Self {
        self.validate_amounts = enabled;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[instrument(name = "SessionPreview", skip(self), fields(from = %request.from, to = %request.to))]
    pub async fn start_preview(&self, request: ConversionRequest) -> Result<QuoteResult, QuoteError> {
        let guard = self.begin(Operation::Preview, &request)?;
        let outcome = self.service.pre_quote(&request).await;
        self.finish(guard, outcome, request, |state, result| {
            state.last_preview = Some(result.clone());
        })
    }

    #[instrument(name = "SessionConvert", skip(self), fields(from = %request.from, to = %request.to))]
    pub async fn start_conversion(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionResult, QuoteError> {
        let guard = self.begin(Operation::Conversion, &request)?;
        let outcome = self.service.convert(&request).await;
        self.finish(guard, outcome, request, |state, result| {
            state.last_conversion = Some(result.clone());
        })
    }

    /// Idle -> Loading. Clears both result slots.
    fn begin(
        &self,
        operation: Operation,
        request: &ConversionRequest,
    ) -> Result<InFlight<'_>, QuoteError> {
        if self.validate_amounts {
            if let Err(e) = request.validate() {
                self.reporter.report(operation, &e);
                return Err(e);
            }
        }

        let mut busy = false;
        self.state.send_if_modified(|state| {
            if state.mode == Mode::Loading {
                busy = true;
                return false;
            }
            state.mode = Mode::Loading;
            state.in_flight = Some(operation);
            state.last_preview = None;
            state.last_conversion = None;
            state.last_request = None;
            true
        });

        if busy {
            debug!(%operation, "Rejected request while another is in flight");
            return Err(QuoteError::Busy);
        }
        debug!(%operation, "Request started");
        Ok(InFlight {
            state: &self.state,
            operation,
            armed: true,
        })
    }

    /// Loading -> Idle, storing the result on success.
    fn finish<T>(
        &self,
        mut guard: InFlight<'_>,
        outcome: Result<T, QuoteError>,
        request: ConversionRequest,
        store: impl FnOnce(&mut SessionState, &T),
    ) -> Result<T, QuoteError> {
        let operation = guard.operation;
        guard.armed = false;
        self.state.send_modify(|state| {
            state.mode = Mode::Idle;
            state.in_flight = None;
            if let Ok(result) = &outcome {
                store(state, result);
                state.last_request = Some(request);
            }
        });

        match &outcome {
            Ok(_) => debug!(%operation, "Request completed"),
            Err(e) => self.reporter.report(operation, e),
        }
        outcome
    }
}
