//! Diagnostic collaborator used to report lightweight-unit fallbacks.

use std::error::Error;

/// Receives `(message, cause)` pairs from a factory.
pub trait DiagnosticSink: Send + Sync {
    /// Report a recovered failure
    fn report(&self, message: &str, cause: &(dyn Error + 'static));
}

/// Forwards reports to `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, message: &str, cause: &(dyn Error + 'static)) {
        tracing::error!(error = %cause, "{message}");
    }
}

impl<F> DiagnosticSink for F
where
    F: Fn(&str, &(dyn Error + 'static)) + Send + Sync,
{
    fn report(&self, message: &str, cause: &(dyn Error + 'static)) {
        self(message, cause);
    }
}
