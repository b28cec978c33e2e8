//! Default diagnostics sink.

use std::error::Error;

use tracing::error;

use mediajob_core::traits::DiagnosticsSink;

/// Reports absorbed failures as `error` level tracing events, including the
/// chain of underlying causes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn report_exception(&self, err: &(dyn Error + 'static), context: &str) {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        error!(error = %err, causes = ?causes, "{context}");
    }
}
