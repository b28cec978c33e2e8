//! Fallback publish channel.

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::result::AppResult;

/// Publish/subscribe bus used for job notifications when no webhook URL is
/// configured.
///
/// Messages are handed over as structured maps; any wire encoding is the
/// implementation's concern.
#[async_trait]
pub trait NotificationPublisher: Send + Sync + fmt::Debug {
    /// Publish one message.
    async fn publish(&self, message: &Map<String, Value>) -> AppResult<()>;
}
