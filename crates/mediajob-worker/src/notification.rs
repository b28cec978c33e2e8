//! Lifecycle notification messages.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reason sent with the terminal notification of a cancelled job.
pub const CANCELLED_REASON: &str = "Cancelled";

/// Lifecycle event carried in the `event` field of every notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobEvent {
    /// An attempt began.
    Started,
    /// The processor reported progress.
    Progress,
    /// The processor finished successfully.
    Completed,
    /// The attempt failed and the job will be retried.
    FailedWillRetry,
    /// The job failed for good, or was cancelled.
    Failed,
}

impl JobEvent {
    /// Return the wire name of the event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Progress => "progress",
            Self::Completed => "completed",
            Self::FailedWillRetry => "failed_will_retry",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An outbound lifecycle message: ordered fields led by `event`.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    event: JobEvent,
    fields: Map<String, Value>,
}

impl Notification {
    fn new(event: JobEvent) -> Self {
        let mut fields = Map::new();
        fields.insert("event".to_string(), Value::from(event.as_str()));
        Self { event, fields }
    }

    /// Merge `payload` into the message. `event` is never overwritten.
    fn merge(mut self, payload: Map<String, Value>) -> Self {
        for (key, value) in payload {
            if key != "event" {
                self.fields.insert(key, value);
            }
        }
        self
    }

    fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// An attempt began.
    pub fn started() -> Self {
        Self::new(JobEvent::Started)
    }

    /// Processor progress, fields passed through as given.
    pub fn progress(payload: Map<String, Value>) -> Self {
        Self::new(JobEvent::Progress).merge(payload)
    }

    /// Successful completion. Result fields are merged over `time_taken`.
    pub fn completed(time_taken_secs: f64, result: Option<Map<String, Value>>) -> Self {
        Self::new(JobEvent::Completed)
            .with("time_taken", time_taken_secs)
            .merge(result.unwrap_or_default())
    }

    /// A failed attempt that will be retried.
    pub fn failed_will_retry(reason: impl Into<String>) -> Self {
        Self::new(JobEvent::FailedWillRetry).with("reason", reason.into())
    }

    /// Terminal failure.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::new(JobEvent::Failed).with("reason", reason.into())
    }

    /// Terminal failure caused by cancellation.
    pub fn cancelled() -> Self {
        Self::failed(CANCELLED_REASON)
    }

    /// The lifecycle event of this message.
    pub fn event(&self) -> JobEvent {
        self.event
    }

    /// Message fields, including `event`.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Final message as delivered, with the job reference merged in last.
    pub fn into_message(self, reference: Option<&Value>) -> Map<String, Value> {
        let mut fields = self.fields;
        if let Some(reference) = reference {
            fields.insert("reference".to_string(), reference.clone());
        }
        fields
    }
}
