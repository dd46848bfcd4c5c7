//! Receipt storage errors.

use thiserror::Error;

/// Failures while talking to the receipt object store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The provider could not be set up from configuration.
    #[error("receipt storage misconfigured: {0}")]
    Configuration(String),

    /// The provider rejected or failed a request.
    #[error("receipt storage request failed: {0}")]
    Operation(String),

    /// A file name that would resolve outside the receipt directory.
    #[error("invalid receipt file name: {0:?}")]
    InvalidKey(String),
}

impl StorageError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        Self::Operation(err.to_string())
    }
}
