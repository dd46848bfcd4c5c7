//! Storage configuration types.

use covenant_shared::config::StorageProvider;

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Directory receipts are kept under, without leading or trailing `/`.
    pub prefix: String,
}

impl StorageConfig {
    /// Default receipt directory.
    pub const DEFAULT_PREFIX: &'static str = "comprovantes";

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            prefix: Self::DEFAULT_PREFIX.to_string(),
        }
    }

    /// Set the receipt directory.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into().trim_matches('/').to_string();
        self
    }

    /// Full object path for a receipt file name.
    #[must_use]
    pub fn object_path(&self, file_name: &str) -> String {
        if self.prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{file_name}", self.prefix)
        }
    }
}
