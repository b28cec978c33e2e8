//! Exception reporting sink.

use std::error::Error;
use std::fmt;

/// Receives failures that are absorbed rather than propagated.
///
/// Used for both job failures and notification delivery failures.
/// Implementations must not panic and have no way to report their own
/// failures back to the caller.
pub trait DiagnosticsSink: Send + Sync + fmt::Debug {
    /// Record `error` together with a short description of what failed.
    fn report_exception(&self, error: &(dyn Error + 'static), context: &str);
}
