// Webhook notifier - delivers the composed report

use crate::error::MonitorError;
use crate::Result;
use serde_json::json;
use std::time::Duration;
use tracing::info;

/// Posts the rendered report to the configured webhook.
///
/// Delivery is one POST of `{"content": <report>}`; failures are not
/// retried here - the outer process turns them into a non-zero exit.
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { url, client })
    }

    /// Deliver the report content to the webhook
    pub async fn deliver(&self, content: &str) -> Result<()> {
        let payload = json!({ "content": content });

        let response = self.client.post(&self.url).json(&payload).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MonitorError::WebhookDelivery { status, body }.into());
        }

        info!("report delivered to webhook");
        Ok(())
    }
}
