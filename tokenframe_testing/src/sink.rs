//! Diagnostic sink that keeps every report for later assertions.

use std::sync::{Arc, Mutex};

use tokenframe::{Diagnostic, DiagnosticSink};

/// Collects diagnostics reported by a channel.
///
/// Clones share the same storage, so one clone can be handed to the channel
/// while the test inspects another.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    reports: Arc<Mutex<Vec<Diagnostic>>>,
}

impl RecordingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Snapshot of everything reported so far.
    #[must_use]
    pub fn reports(&self) -> Vec<Diagnostic> {
        self.reports
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Shared handle suitable for [`TokenChannel::with_sink`](tokenframe::TokenChannel::with_sink).
    #[must_use]
    pub fn handle(&self) -> Arc<dyn DiagnosticSink> { Arc::new(self.clone()) }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.reports
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(diagnostic.clone());
    }
}
