//! Notification delivery configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lifecycle notification delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Timeout for a single webhook POST, in seconds.
    #[serde(default = "default_webhook_timeout")]
    pub webhook_timeout_seconds: u64,
    /// `User-Agent` header sent with webhook requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Publish channel used when a job has no webhook URL.
    #[serde(default)]
    pub fallback: FallbackConfig,
}

impl NotificationConfig {
    /// Webhook timeout as a [`Duration`].
    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_seconds)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            webhook_timeout_seconds: default_webhook_timeout(),
            user_agent: default_user_agent(),
            fallback: FallbackConfig::default(),
        }
    }
}

/// Which pub/sub backend carries notifications for jobs without a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackProvider {
    /// No fallback; messages without a webhook are dropped.
    None,
    /// Redis `PUBLISH` (requires the `redis-pubsub` feature of the worker crate).
    Redis,
}

impl fmt::Display for FallbackProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Redis => write!(f, "redis"),
        }
    }
}

/// Fallback publish channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Backend to use.
    #[serde(default = "default_provider")]
    pub provider: FallbackProvider,
    /// Channel (topic) name messages are published on.
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Redis connection URL, used by the `redis` provider.
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            channel: default_channel(),
            redis_url: default_redis_url(),
        }
    }
}

fn default_webhook_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("mediajob/{}", env!("CARGO_PKG_VERSION"))
}

fn default_provider() -> FallbackProvider {
    FallbackProvider::None
}

fn default_channel() -> String {
    "media_jobs".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}
