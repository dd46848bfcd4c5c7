//! New study announcements.

use std::sync::Arc;

use tracing::{error, info};

use super::error::NotificationError;
use super::types::{DeliveryReport, PushMessage, PushPriority, PushSender, SubscriberDirectory};

const ANNOUNCEMENT_TITLE: &str = "📖 Nova Palavra Liberada!";

/// Tells subscribed members that a new bible study is available.
pub struct StudyAnnouncer {
    directory: Arc<dyn SubscriberDirectory>,
    sender: Arc<dyn PushSender>,
}

impl StudyAnnouncer {
    /// Create a new announcer.
    #[must_use]
    pub fn new(directory: Arc<dyn SubscriberDirectory>, sender: Arc<dyn PushSender>) -> Self {
        Self { directory, sender }
    }

    /// Announce the study titled `title` to every subscriber.
    ///
    /// Delivery failures are logged and reported as failed tokens; only a
    /// failure to load the subscribers is returned as an error.
    pub async fn announce(&self, title: &str) -> Result<DeliveryReport, NotificationError> {
        let tokens = self.directory.subscriber_tokens().await?;
        if tokens.is_empty() {
            info!("No subscribers for study announcement");
            return Ok(DeliveryReport::default());
        }

        let recipients = tokens.len();
        let message = PushMessage {
            tokens,
            title: ANNOUNCEMENT_TITLE.to_string(),
            body: format!("Confira agora: \"{title}\""),
            priority: PushPriority::Normal,
        };

        match self.sender.send_each(&message).await {
            Ok(report) => {
                info!(sent = report.sent, failed = report.failed, "Study announcement sent");
                Ok(report)
            }
            Err(e) => {
                error!(error = %e, recipients, "Study announcement failed");
                Ok(DeliveryReport {
                    sent: 0,
                    failed: recipients,
                })
            }
        }
    }
}
