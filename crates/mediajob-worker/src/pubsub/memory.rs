//! In-memory pub/sub for single-process deployments.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tracing::trace;

use mediajob_core::result::AppResult;
use mediajob_core::traits::NotificationPublisher;

/// Broadcasts notifications to in-process subscribers.
///
/// Cloning yields another handle to the same channel.
#[derive(Debug, Clone)]
pub struct MemoryPublisher {
    tx: broadcast::Sender<Map<String, Value>>,
}

impl MemoryPublisher {
    /// Create a publisher whose subscribers buffer up to `buffer_size` messages.
    pub fn new(buffer_size: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer_size);
        Self { tx }
    }

    /// Subscribe to every message published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Map<String, Value>> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl NotificationPublisher for MemoryPublisher {
    async fn publish(&self, message: &Map<String, Value>) -> AppResult<()> {
        // No subscribers is not an error; the message is simply dropped.
        if self.tx.send(message.clone()).is_err() {
            trace!("No subscribers for in-memory notification");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_messages() {
        let publisher = MemoryPublisher::new(8);
        let mut rx = publisher.subscribe();

        let mut message = Map::new();
        message.insert("event".to_string(), json!("started"));
        publisher.publish(&message).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), message);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_succeeds() {
        let publisher = MemoryPublisher::new(8);
        assert!(publisher.publish(&Map::new()).await.is_ok());
    }
}
