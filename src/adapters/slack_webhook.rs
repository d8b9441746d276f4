//! Slack incoming-webhook notifier.

use crate::domain::error::KabuError;
use crate::ports::notify_port::NotifyPort;
use reqwest::blocking::Client;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(15);

pub struct SlackWebhookAdapter {
    client: Client,
    url: String,
}

impl SlackWebhookAdapter {
    pub fn new(url: impl Into<String>) -> Result<Self, KabuError> {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| KabuError::Notify {
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl NotifyPort for SlackWebhookAdapter {
    fn send(&self, text: &str) -> Result<(), KabuError> {
        let payload = serde_json::json!({ "text": text });
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .map_err(|e| KabuError::Notify {
                reason: format!("webhook request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(KabuError::Notify {
                reason: format!("webhook returned {}: {}", status, body.trim()),
            });
        }

        tracing::info!(bytes = text.len(), "posted message to webhook");
        Ok(())
    }
}
