//! Webhook delivery over HTTP.

use std::fmt;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use mediajob_core::config::NotificationConfig;
use mediajob_core::error::{AppError, ErrorKind};
use mediajob_core::result::AppResult;

/// Content type of every webhook body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Sends a JSON document to a webhook URL.
#[async_trait]
pub trait WebhookSender: Send + Sync + fmt::Debug {
    /// POST `body` to `url`. Only transport failures are errors.
    async fn post_json(&self, url: &str, body: String) -> AppResult<()>;
}

/// Webhook sender backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpWebhookSender {
    client: reqwest::Client,
}

impl HttpWebhookSender {
    /// Create a sender with the configured timeout and user agent.
    pub fn new(config: &NotificationConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.webhook_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Configuration,
                    format!("Failed to build webhook client: {e}"),
                    e,
                )
            })?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WebhookSender for HttpWebhookSender {
    async fn post_json(&self, url: &str, body: String) -> AppResult<()> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Webhook POST to {url} failed: {e}"),
                    e,
                )
            })?;

        // Status is not inspected; only transport failures count.
        debug!(url, status = %response.status(), "Webhook delivered");
        Ok(())
    }
}
