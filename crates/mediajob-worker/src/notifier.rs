//! Lifecycle notification delivery.
//!
//! A message goes to exactly one channel: the job's webhook when it has a
//! notification URL, otherwise the fallback publisher when one is
//! configured, otherwise nowhere. Delivery failures are reported to the
//! diagnostics sink and never reach the job.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use mediajob_core::config::{FallbackProvider, NotificationConfig};
use mediajob_core::error::AppError;
use mediajob_core::result::AppResult;
use mediajob_core::traits::{DiagnosticsSink, NotificationPublisher};
use mediajob_entity::Job;

use crate::notification::Notification;
use crate::webhook::{HttpWebhookSender, WebhookSender};

/// Where a job's notifications go and what they are tagged with.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationTarget<'a> {
    /// Webhook URL; takes precedence over the fallback publisher.
    pub notification_url: Option<&'a str>,
    /// Correlation value merged into every message.
    pub reference: Option<&'a Value>,
}

impl<'a> From<&'a Job> for NotificationTarget<'a> {
    fn from(job: &'a Job) -> Self {
        Self {
            notification_url: job.notification_url(),
            reference: job.reference(),
        }
    }
}

/// Delivers lifecycle notifications via webhook or fallback publisher.
#[derive(Debug, Clone)]
pub struct Notifier {
    /// Webhook transport
    webhook: Arc<dyn WebhookSender>,
    /// Pub/sub used when a job has no webhook
    fallback: Option<Arc<dyn NotificationPublisher>>,
    /// Receives delivery failures
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl Notifier {
    /// Create a notifier from explicit collaborators.
    pub fn new(
        webhook: Arc<dyn WebhookSender>,
        fallback: Option<Arc<dyn NotificationPublisher>>,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        Self {
            webhook,
            fallback,
            diagnostics,
        }
    }

    /// Create a notifier with an HTTP webhook sender and the configured
    /// fallback publisher.
    pub fn from_config(
        config: &NotificationConfig,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> AppResult<Self> {
        let webhook = Arc::new(HttpWebhookSender::new(config)?);

        let fallback: Option<Arc<dyn NotificationPublisher>> = match config.fallback.provider {
            FallbackProvider::None => None,
            #[cfg(feature = "redis-pubsub")]
            FallbackProvider::Redis => Some(Arc::new(crate::pubsub::RedisPublisher::new(
                &config.fallback.redis_url,
                config.fallback.channel.clone(),
            )?)),
            #[cfg(not(feature = "redis-pubsub"))]
            FallbackProvider::Redis => {
                return Err(AppError::configuration(
                    "Redis fallback requires the `redis-pubsub` feature",
                ));
            }
        };

        info!(
            fallback = %config.fallback.provider,
            "Notifier initialized"
        );

        Ok(Self::new(webhook, fallback, diagnostics))
    }

    /// Whether a fallback publisher is available.
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Deliver one notification. Never fails and never retries.
    pub async fn deliver(&self, target: &NotificationTarget<'_>, notification: Notification) {
        let event = notification.event();
        let message = notification.into_message(target.reference);

        if let Some(url) = target.notification_url {
            let body = match serde_json::to_string(&message) {
                Ok(body) => body,
                Err(e) => {
                    self.diagnostics
                        .report_exception(&AppError::from(e), "Notification encoding failed");
                    return;
                }
            };

            info!(url, %event, "Notifying {} with message: {}", url, body);
            if let Err(e) = self.webhook.post_json(url, body).await {
                self.diagnostics
                    .report_exception(&e, "Notification failed with exception");
            }
        } else if let Some(publisher) = &self.fallback {
            debug!(%event, "Publishing notification to fallback channel");
            if let Err(e) = publisher.publish(&message).await {
                self.diagnostics
                    .report_exception(&e, "Fallback notification failed with exception");
            }
        } else {
            debug!(%event, "No notification channel configured, dropping message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::TracingDiagnostics;

    #[tokio::test]
    async fn test_from_config_without_fallback() {
        let notifier =
            Notifier::from_config(&NotificationConfig::default(), Arc::new(TracingDiagnostics))
                .unwrap();
        assert!(!notifier.has_fallback());
    }

    #[cfg(not(feature = "redis-pubsub"))]
    #[tokio::test]
    async fn test_redis_fallback_needs_feature() {
        let mut config = NotificationConfig::default();
        config.fallback.provider = FallbackProvider::Redis;
        let err = Notifier::from_config(&config, Arc::new(TracingDiagnostics)).unwrap_err();
        assert_eq!(err.kind, mediajob_core::error::ErrorKind::Configuration);
    }

    #[cfg(feature = "redis-pubsub")]
    #[tokio::test]
    async fn test_redis_fallback_from_config() {
        let mut config = NotificationConfig::default();
        config.fallback.provider = FallbackProvider::Redis;
        config.fallback.redis_url = "redis://127.0.0.1:6379".to_string();
        let notifier = Notifier::from_config(&config, Arc::new(TracingDiagnostics)).unwrap();
        assert!(notifier.has_fallback());
    }

    #[tokio::test]
    async fn test_deliver_without_channels_is_silent() {
        let notifier =
            Notifier::from_config(&NotificationConfig::default(), Arc::new(TracingDiagnostics))
                .unwrap();
        notifier
            .deliver(&NotificationTarget::default(), Notification::started())
            .await;
    }
}
