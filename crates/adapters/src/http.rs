//! Shared HTTP client construction.

use std::time::Duration;

use covenant_shared::config::HttpClientConfig;
use thiserror::Error;

/// Failure to build the outbound HTTP client.
#[derive(Debug, Error)]
#[error("failed to build HTTP client: {0}")]
pub struct HttpClientError(#[from] reqwest::Error);

/// Builds the process-wide HTTP client used by every adapter.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_http_client(config: &HttpClientConfig) -> Result<reqwest::Client, HttpClientError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("covenant/", env!("CARGO_PKG_VERSION")))
        .gzip(true)
        .build()?;
    Ok(client)
}
