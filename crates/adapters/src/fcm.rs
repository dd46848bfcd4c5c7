//! Firebase Cloud Messaging sender.

use async_trait::async_trait;
use covenant_core::notification::{
    DeliveryReport, NotificationError, PushMessage, PushPriority, PushSender,
};
use covenant_shared::config::PushConfig;
use serde_json::{Value, json};
use tracing::{debug, warn};

/// Sends notifications through the FCM HTTP v1 API, one request per token.
#[derive(Debug, Clone)]
pub struct FcmPushSender {
    client: reqwest::Client,
    send_url: String,
    access_token: String,
}

impl FcmPushSender {
    /// Create a new sender.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &PushConfig) -> Self {
        Self {
            client,
            send_url: format!(
                "{}/projects/{}/messages:send",
                config.endpoint.trim_end_matches('/'),
                config.project_id
            ),
            access_token: config.access_token.clone(),
        }
    }

    async fn send_one(&self, body: &Value) -> Result<(), String> {
        let response = self
            .client
            .post(&self.send_url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let detail = response.text().await.unwrap_or_default();
            Err(format!("HTTP {}: {detail}", status.as_u16()))
        }
    }
}

/// Builds the v1 `messages:send` body for a single device.
pub fn message_body(token: &str, message: &PushMessage) -> Value {
    let mut body = json!({
        "message": {
            "token": token,
            "notification": {
                "title": message.title,
                "body": message.body,
            }
        }
    });
    if message.priority == PushPriority::High {
        body["message"]["android"] = json!({ "priority": "HIGH" });
    }
    body
}

#[async_trait]
impl PushSender for FcmPushSender {
    async fn send_each(&self, message: &PushMessage) -> Result<DeliveryReport, NotificationError> {
        let mut report = DeliveryReport::default();
        let mut last_error = None;

        for token in &message.tokens {
            match self.send_one(&message_body(token, message)).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    warn!(error = %e, "Push delivery to device failed");
                    report.failed += 1;
                    last_error = Some(e);
                }
            }
        }

        debug!(sent = report.sent, failed = report.failed, "Push batch finished");

        match last_error {
            Some(e) if report.sent == 0 => Err(NotificationError::delivery(e)),
            _ => Ok(report),
        }
    }
}
