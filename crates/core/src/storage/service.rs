//! Storage service implementation using Apache OpenDAL.

use async_trait::async_trait;
use opendal::{Operator, services};
use tracing::debug;

use super::config::StorageConfig;
use super::error::StorageError;
use crate::cleanup::ReceiptObjectStore;
use covenant_shared::config::StorageProvider;

/// Object storage holding uploaded receipt files.
pub struct ReceiptStorage {
    operator: Operator,
    config: StorageConfig,
}

impl ReceiptStorage {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                build(builder)
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                build(builder)
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                build(builder)
            }
        }
    }

    /// Delete a receipt file.
    ///
    /// Deleting a file that is already gone succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unusable or deletion fails.
    pub async fn delete(&self, file_name: &str) -> Result<(), StorageError> {
        validate_file_name(file_name)?;
        let path = self.config.object_path(file_name);
        debug!(path = %path, "Deleting receipt file");
        self.operator.delete(&path).await.map_err(StorageError::from)
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }
}

#[async_trait]
impl ReceiptObjectStore for ReceiptStorage {
    async fn remove(&self, file_name: &str) -> Result<(), StorageError> {
        self.delete(file_name).await
    }
}

/// Rejects keys that would escape the receipt directory.
fn validate_file_name(file_name: &str) -> Result<(), StorageError> {
    if file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains('/')
        || file_name.contains('\\')
    {
        return Err(StorageError::InvalidKey(file_name.to_string()));
    }
    Ok(())
}

fn build(builder: impl opendal::Builder) -> Result<Operator, StorageError> {
    Ok(Operator::new(builder)
        .map_err(|e| StorageError::configuration(e.to_string()))?
        .finish())
}
