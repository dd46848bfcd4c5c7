//! Application configuration management.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::Cnpj;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Receipt validation configuration.
    #[serde(default)]
    pub validator: ValidatorConfig,
    /// OCR service configuration.
    pub ocr: OcrConfig,
    /// Push notification configuration.
    pub push: PushConfig,
    /// Receipt object storage. Cleanup is disabled when absent.
    #[serde(default)]
    pub storage: Option<StorageProvider>,
    /// Background job schedule.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Outbound HTTP client settings.
    #[serde(default)]
    pub http: HttpClientConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Receipt validation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorConfig {
    /// CNPJ that must appear on every accepted receipt.
    #[serde(default = "default_cnpj")]
    pub cnpj: Cnpj,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            cnpj: default_cnpj(),
        }
    }
}

fn default_cnpj() -> Cnpj {
    Cnpj::OFFICIAL
}

/// OCR service configuration (Google Vision REST API).
#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// `images:annotate` endpoint.
    #[serde(default = "default_ocr_endpoint")]
    pub endpoint: String,
    /// API key sent as the `key` query parameter.
    pub api_key: String,
}

fn default_ocr_endpoint() -> String {
    "https://vision.googleapis.com/v1/images:annotate".to_string()
}

/// Push notification configuration (FCM HTTP v1).
#[derive(Debug, Clone, Deserialize)]
pub struct PushConfig {
    /// FCM API base URL.
    #[serde(default = "default_push_endpoint")]
    pub endpoint: String,
    /// Firebase project identifier.
    pub project_id: String,
    /// OAuth2 bearer token for the messaging scope.
    pub access_token: String,
}

fn default_push_endpoint() -> String {
    "https://fcm.googleapis.com/v1".to_string()
}

/// Receipt storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
        }
    }
}

/// Background job schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Whether the server spawns the background jobs.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// IANA timezone used for medication times and the cleanup hour.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Seconds between medication checks.
    #[serde(default = "default_medication_interval")]
    pub medication_interval_secs: u64,
    /// Local hour (0-23) at which the receipt cleanup runs.
    #[serde(default)]
    pub cleanup_hour: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timezone: default_timezone(),
            medication_interval_secs: default_medication_interval(),
            cleanup_hour: 0,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_timezone() -> String {
    "America/Sao_Paulo".to_string()
}

fn default_medication_interval() -> u64 {
    600 // 10 minutes
}

/// Outbound HTTP client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpClientConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("COVENANT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
