//! Collaborators the receipt validator depends on.
//!
//! Implemented by the adapters and db crates; swapped for test doubles in tests.

use async_trait::async_trait;
use bytes::Bytes;

use super::error::{StoreError, ValidationError};
use super::types::{FetchedDocument, RecordUpdate, TextAnnotation};

/// Downloads a document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetches the body and declared content type at `url`.
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, ValidationError>;
}

/// Reads the text embedded in a PDF.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PdfTextExtractor: Send + Sync {
    /// Returns the embedded text; image-only PDFs yield an empty string.
    async fn extract_text(&self, pdf: Bytes) -> Result<String, ValidationError>;
}

/// Optical character recognition.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OcrService: Send + Sync {
    /// Returns the detected text regions, full-page text first.
    async fn detect_text(
        &self,
        document: &FetchedDocument,
    ) -> Result<Vec<TextAnnotation>, ValidationError>;
}

/// Keyed store of financial records.
#[async_trait]
pub trait FinancialRecordStore: Send + Sync {
    /// Merges `update` into the record with key `record_id`.
    ///
    /// Fails with `StoreError::NotFound` when the record does not exist.
    async fn apply(&self, record_id: &str, update: &RecordUpdate) -> Result<(), StoreError>;
}
