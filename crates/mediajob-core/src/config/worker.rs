//! Job execution configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Job execution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Pause between a failed attempt and the next one, in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Minimum spacing between two progress notifications, in seconds.
    #[serde(default = "default_progress_interval")]
    pub progress_interval_seconds: u64,
}

impl WorkerConfig {
    /// Retry pause as a [`Duration`].
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Progress throttle interval as a [`Duration`].
    pub fn progress_interval(&self) -> Duration {
        Duration::from_secs(self.progress_interval_seconds)
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            retry_delay_ms: default_retry_delay(),
            progress_interval_seconds: default_progress_interval(),
        }
    }
}

fn default_retry_delay() -> u64 {
    1000
}

fn default_progress_interval() -> u64 {
    10
}
