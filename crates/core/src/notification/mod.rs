//! Push notifications to members and event staff.
//!
//! - `announcement` - new bible study published
//! - `medication` - participant due a controlled medication

mod announcement;
mod error;
mod medication;
mod types;

pub use announcement::StudyAnnouncer;
pub use error::NotificationError;
pub use medication::{HEALTH_TEAM_PERMISSIONS, MedicationReminder, ReminderReport};
pub use types::{
    DeliveryReport, MedicatedRegistration, PushMessage, PushPriority, PushSender,
    RegistrationDirectory, SubscriberDirectory,
};
