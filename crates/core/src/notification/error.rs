//! Notification error types.

use thiserror::Error;

/// Notification errors.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Recipients or registrations could not be loaded.
    #[error("directory lookup failed: {0}")]
    Directory(String),

    /// The push provider rejected the whole request.
    #[error("push delivery failed: {0}")]
    Delivery(String),
}

impl NotificationError {
    /// Create a directory error.
    #[must_use]
    pub fn directory(msg: impl Into<String>) -> Self {
        Self::Directory(msg.into())
    }

    /// Create a delivery error.
    #[must_use]
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }
}
