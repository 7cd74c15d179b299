//! Webhook delivery

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::errors::DeployError;
use crate::notify::{cards, Channel, Notification, NotificationDispatcher};

/// Posts cards to chat webhooks
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    pub fn new() -> Result<Self, DeployError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client })
    }

    async fn post(&self, webhook: &str, card: &serde_json::Value) -> Result<(), DeployError> {
        let response = self.client.post(webhook).json(card).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DeployError::NotificationError(format!("{}: {}", status, body)));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationDispatcher for WebhookNotifier {
    async fn send(&self, channel: Channel, webhook: &str, notification: &Notification) {
        let card = cards::render(channel, notification);
        match self.post(webhook, &card).await {
            Ok(()) => debug!(
                "Sent {} notification to {} for {}",
                notification.outcome.as_str(),
                channel,
                notification.app_id
            ),
            Err(e) => warn!("Failed to send {} notification: {}", channel, e),
        }
    }
}
