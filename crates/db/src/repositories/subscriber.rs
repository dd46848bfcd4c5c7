//! Study announcement subscribers.

use async_trait::async_trait;
use covenant_core::notification::{NotificationError, SubscriberDirectory};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};

use crate::entities::notification_subscribers;

/// Subscriber repository.
#[derive(Debug)]
pub struct SubscriberRepository {
    db: DatabaseConnection,
}

impl SubscriberRepository {
    /// Creates a new subscriber repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a device token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn subscribe(&self, token: &str) -> Result<(), DbErr> {
        notification_subscribers::ActiveModel {
            token: Set(token.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SubscriberDirectory for SubscriberRepository {
    async fn subscriber_tokens(&self) -> Result<Vec<String>, NotificationError> {
        let rows = notification_subscribers::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| NotificationError::directory(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| row.token)
            .filter(|t| !t.is_empty())
            .collect())
    }
}
