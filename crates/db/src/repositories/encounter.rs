//! Encounter registrations and staff accounts.

use async_trait::async_trait;
use covenant_core::notification::{
    HEALTH_TEAM_PERMISSIONS, MedicatedRegistration, NotificationError, RegistrationDirectory,
};
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use serde_json::Value;

use crate::entities::{access_accounts, encounter_registrations};

/// Encounter repository.
#[derive(Debug)]
pub struct EncounterRepository {
    db: DatabaseConnection,
}

impl EncounterRepository {
    /// Creates a new encounter repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Reads a JSON array of strings, ignoring anything that is not a string.
pub fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Returns true if the account holds a health team permission.
pub fn is_health_team(account: &access_accounts::Model) -> bool {
    string_list(&account.encounter_permissions)
        .iter()
        .any(|p| HEALTH_TEAM_PERMISSIONS.contains(&p.as_str()))
}

fn directory_error(err: DbErr) -> NotificationError {
    NotificationError::directory(err.to_string())
}

#[async_trait]
impl RegistrationDirectory for EncounterRepository {
    async fn medicated_registrations(&self) -> Result<Vec<MedicatedRegistration>, NotificationError> {
        let rows = encounter_registrations::Entity::find()
            .filter(encounter_registrations::Column::ControlledMedication.is_not_null())
            .filter(encounter_registrations::Column::ControlledMedication.ne(""))
            .all(&self.db)
            .await
            .map_err(directory_error)?;

        Ok(rows
            .into_iter()
            .map(|row| MedicatedRegistration {
                schedule: string_list(&row.medication_times),
                id: row.id,
                name: row.name,
                medication: row.controlled_medication.unwrap_or_default(),
            })
            .collect())
    }

    async fn health_team_tokens(&self) -> Result<Vec<String>, NotificationError> {
        let accounts = access_accounts::Entity::find()
            .filter(access_accounts::Column::FcmToken.is_not_null())
            .all(&self.db)
            .await
            .map_err(directory_error)?;

        Ok(accounts
            .into_iter()
            .filter(is_health_team)
            .filter_map(|a| a.fcm_token)
            .filter(|t| !t.is_empty())
            .collect())
    }
}
