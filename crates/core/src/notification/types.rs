//! Notification types and collaborators.

use async_trait::async_trait;
use serde::Serialize;

use super::error::NotificationError;

/// Delivery priority hint for the push provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PushPriority {
    /// Provider default.
    #[default]
    Normal,
    /// Wake the device immediately.
    High,
}

/// A notification addressed to several device tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    /// Device registration tokens.
    pub tokens: Vec<String>,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Delivery priority.
    pub priority: PushPriority,
}

/// Per-token delivery counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    /// Tokens the provider accepted.
    pub sent: usize,
    /// Tokens the provider rejected.
    pub failed: usize,
}

/// An event participant who takes controlled medication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicatedRegistration {
    /// Registration key.
    pub id: String,
    /// Participant name.
    pub name: String,
    /// Medication description as written on the form.
    pub medication: String,
    /// Times of day, `HH:MM`, the medication is due.
    pub schedule: Vec<String>,
}

/// Sends push notifications.
#[async_trait]
pub trait PushSender: Send + Sync {
    /// Sends `message` to each token individually.
    ///
    /// Per-token failures are counted in the report; `Err` means nothing
    /// could be sent.
    async fn send_each(&self, message: &PushMessage) -> Result<DeliveryReport, NotificationError>;
}

/// Members subscribed to study announcements.
#[async_trait]
pub trait SubscriberDirectory: Send + Sync {
    /// Device tokens of every subscriber.
    async fn subscriber_tokens(&self) -> Result<Vec<String>, NotificationError>;
}

/// Event registrations and staff accounts.
#[async_trait]
pub trait RegistrationDirectory: Send + Sync {
    /// Registrations with a non-empty controlled medication.
    async fn medicated_registrations(&self) -> Result<Vec<MedicatedRegistration>, NotificationError>;

    /// Device tokens of staff with the health or coordinator permission.
    async fn health_team_tokens(&self) -> Result<Vec<String>, NotificationError>;
}
