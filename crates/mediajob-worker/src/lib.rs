//! Single-job execution for media processing workers.
//!
//! This crate provides:
//! - A job runner that drives the start → process → notify → retry loop
//! - A notifier delivering lifecycle messages to a webhook or a fallback
//!   publish channel
//! - A progress throttle limiting how often processors can notify
//! - A static processor registry keyed by job type

pub mod diagnostics;
pub mod notification;
pub mod notifier;
pub mod processor;
pub mod pubsub;
pub mod runner;
pub mod throttle;
pub mod webhook;

pub use diagnostics::TracingDiagnostics;
pub use notification::{JobEvent, Notification};
pub use notifier::{NotificationTarget, Notifier};
pub use processor::{Processor, ProcessorError, ProcessorRegistry, ProgressReporter};
pub use runner::{JobCancelled, JobRunner, RunnerSettings};
pub use throttle::ProgressThrottle;
pub use webhook::{HttpWebhookSender, WebhookSender};
