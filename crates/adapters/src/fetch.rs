//! Receipt download over HTTP(S).

use async_trait::async_trait;
use covenant_core::receipt::{DocumentFetcher, FetchedDocument, ValidationError};
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

/// Downloads receipts with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpDocumentFetcher {
    client: reqwest::Client,
}

impl HttpDocumentFetcher {
    /// Create a new fetcher.
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, ValidationError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ValidationError::download(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ValidationError::DownloadStatus {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ValidationError::download(e.to_string()))?;

        debug!(url = %url, content_type = %content_type, size = bytes.len(), "Receipt downloaded");

        Ok(FetchedDocument {
            source_url: url.to_string(),
            content_type,
            bytes,
        })
    }
}
