//! Capability traits for the process-wide collaborators of a job.
//!
//! Implementations are injected into the worker at construction so that
//! jobs never reach for ambient singletons.

pub mod diagnostics;
pub mod publisher;

pub use diagnostics::DiagnosticsSink;
pub use publisher::NotificationPublisher;
