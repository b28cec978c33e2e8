//! Per-attempt execution states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single execution attempt of a job.
///
/// `Pending → Started → {Succeeded, Cancelled, FailedRetryable, FailedTerminal}`.
/// A `FailedRetryable` attempt is followed by a fresh `Started` attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    /// Not started yet.
    Pending,
    /// `started` has been emitted and the processor is being resolved or run.
    Started,
    /// The processor returned a result.
    Succeeded,
    /// A cancellation signal arrived. Propagated to the caller.
    Cancelled,
    /// The attempt failed and retry budget remains.
    FailedRetryable,
    /// The attempt failed with no retry budget left. Absorbed.
    FailedTerminal,
}

impl AttemptState {
    /// Whether no further attempt follows this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Cancelled | Self::FailedTerminal)
    }

    /// Return the state as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Started => "started",
            Self::Succeeded => "succeeded",
            Self::Cancelled => "cancelled",
            Self::FailedRetryable => "failed_retryable",
            Self::FailedTerminal => "failed_terminal",
        }
    }
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
