//! Medication reminders for event participants.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::error::NotificationError;
use super::types::{MedicatedRegistration, PushMessage, PushPriority, PushSender, RegistrationDirectory};

/// Event permissions whose holders receive medication reminders.
pub const HEALTH_TEAM_PERMISSIONS: [&str; 2] = ["Saude", "Coordenador"];

const REMINDER_TITLE: &str = "💊 Hora de Medicar!";

/// Outcome of a reminder check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderReport {
    /// Participants due a medication at the checked minute.
    pub due: usize,
    /// Participants for whom a reminder was delivered to at least one device.
    pub notified: usize,
}

impl MedicatedRegistration {
    /// Returns true when a dose is scheduled at `hhmm`.
    #[must_use]
    pub fn is_due_at(&self, hhmm: &str) -> bool {
        !self.medication.trim().is_empty() && self.schedule.iter().any(|t| t.trim() == hhmm)
    }
}

/// Notifies the health team when a participant is due a controlled medication.
pub struct MedicationReminder {
    directory: Arc<dyn RegistrationDirectory>,
    sender: Arc<dyn PushSender>,
    timezone: Tz,
}

impl MedicationReminder {
    /// Create a new reminder job; schedules are read in `timezone`.
    #[must_use]
    pub fn new(
        directory: Arc<dyn RegistrationDirectory>,
        sender: Arc<dyn PushSender>,
        timezone: Tz,
    ) -> Self {
        Self {
            directory,
            sender,
            timezone,
        }
    }

    /// Local `HH:MM` for an instant.
    #[must_use]
    pub fn local_minute(&self, now: DateTime<Utc>) -> String {
        now.with_timezone(&self.timezone).format("%H:%M").to_string()
    }

    /// Check which participants are due at `now` and notify the health team.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<ReminderReport, NotificationError> {
        let minute = self.local_minute(now);
        let registrations = self.directory.medicated_registrations().await?;
        let due: Vec<&MedicatedRegistration> =
            registrations.iter().filter(|r| r.is_due_at(&minute)).collect();

        debug!(minute = %minute, checked = registrations.len(), due = due.len(), "Medication check");

        let mut report = ReminderReport {
            due: due.len(),
            notified: 0,
        };
        if due.is_empty() {
            return Ok(report);
        }

        let tokens: Vec<String> = self
            .directory
            .health_team_tokens()
            .await?
            .into_iter()
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            warn!(due = report.due, "No health team device to notify");
            return Ok(report);
        }

        for registration in due {
            let message = reminder_message(registration, tokens.clone());
            match self.sender.send_each(&message).await {
                Ok(delivery) => {
                    info!(
                        registration_id = %registration.id,
                        sent = delivery.sent,
                        failed = delivery.failed,
                        "Medication reminder sent"
                    );
                    if delivery.sent > 0 {
                        report.notified += 1;
                    }
                }
                Err(e) => {
                    error!(registration_id = %registration.id, error = %e, "Medication reminder failed");
                }
            }
        }

        Ok(report)
    }
}

fn reminder_message(registration: &MedicatedRegistration, tokens: Vec<String>) -> PushMessage {
    PushMessage {
        tokens,
        title: REMINDER_TITLE.to_string(),
        body: format!(
            "O encontrista {} precisa tomar: {}",
            registration.name, registration.medication
        ),
        priority: PushPriority::High,
    }
}
