//! Redis pub/sub publisher for multi-node deployments.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use mediajob_core::error::{AppError, ErrorKind};
use mediajob_core::result::AppResult;
use mediajob_core::traits::NotificationPublisher;

/// Publishes JSON-encoded notifications on a Redis channel.
#[derive(Debug, Clone)]
pub struct RedisPublisher {
    client: redis::Client,
    channel: String,
}

impl RedisPublisher {
    /// Creates a publisher. The URL is validated here; the connection is
    /// opened on publish.
    pub fn new(url: &str, channel: impl Into<String>) -> AppResult<Self> {
        let client = redis::Client::open(url).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Invalid Redis URL: {e}"),
                e,
            )
        })?;

        Ok(Self {
            client,
            channel: channel.into(),
        })
    }
}

#[async_trait]
impl NotificationPublisher for RedisPublisher {
    async fn publish(&self, message: &Map<String, Value>) -> AppResult<()> {
        let payload = serde_json::to_string(message)?;

        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Redis connection failed: {e}"),
                    e,
                )
            })?;

        let receivers = redis::cmd("PUBLISH")
            .arg(&self.channel)
            .arg(payload)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Redis PUBLISH failed: {e}"),
                    e,
                )
            })?;

        debug!(channel = %self.channel, receivers, "Published notification to Redis");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_url() {
        assert!(RedisPublisher::new("not a url", "media_jobs").is_err());
    }
}
