//! Best-effort reporting of framing failures.
//!
//! A [`TokenChannel`](crate::TokenChannel) reports every failed stage to its
//! [`DiagnosticSink`] before returning the error. Reporting never influences
//! the result of the operation.

use std::fmt;

use crate::stage::Stage;

/// A single framing failure, described for humans and log pipelines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// A field moved fewer bytes than it needed.
    ShortTransfer {
        /// Stage that stopped early.
        stage: Stage,
        /// Bytes moved.
        done: usize,
        /// Bytes required.
        expected: usize,
    },
    /// The transport failed outright.
    TransportError {
        /// Stage that failed.
        stage: Stage,
        /// Raw platform error code, if the transport supplied one.
        code: Option<i32>,
        /// Rendered transport error.
        message: String,
    },
    /// The receive buffer could not be allocated.
    AllocationFailure {
        /// Declared token length.
        requested: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortTransfer {
                stage,
                done,
                expected,
            } => write!(f, "{stage}: {done} of {expected} bytes transferred"),
            Self::TransportError {
                stage,
                code: Some(code),
                message,
            } => write!(f, "{stage}: transport error {code}: {message}"),
            Self::TransportError {
                stage,
                code: None,
                message,
            } => write!(f, "{stage}: transport error: {message}"),
            Self::AllocationFailure { requested } => {
                write!(f, "out of memory allocating {requested} bytes of token data")
            }
        }
    }
}

/// Receiver of framing diagnostics.
pub trait DiagnosticSink: Send + Sync {
    /// Record a diagnostic. Implementations must not block for long.
    fn report(&self, diagnostic: &Diagnostic);
}

/// Sink that emits diagnostics as `tracing` events.
///
/// Short transfers are logged at `WARN`; transport and allocation failures at
/// `ERROR`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::ShortTransfer {
                stage,
                done,
                expected,
            } => tracing::warn!(
                direction = stage.direction.as_str(),
                field = stage.field.as_str(),
                done,
                expected,
                "{diagnostic}"
            ),
            Diagnostic::TransportError { stage, code, .. } => tracing::error!(
                direction = stage.direction.as_str(),
                field = stage.field.as_str(),
                code = ?code,
                "{diagnostic}"
            ),
            Diagnostic::AllocationFailure { requested } => {
                tracing::error!(requested, "{diagnostic}");
            }
        }
    }
}

/// Sink that discards every diagnostic.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: &Diagnostic) {}
}
