//! Embedded PDF text extraction.

use async_trait::async_trait;
use bytes::Bytes;
use covenant_core::receipt::{PdfTextExtractor, ValidationError};
use tracing::debug;

/// Extracts the text layer of a PDF with `pdf-extract`.
///
/// Parsing is CPU-bound and runs on the blocking pool. A parser panic on a
/// malformed file surfaces as `ValidationError::PdfExtraction`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl PdfExtractor {
    /// Create a new extractor.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PdfTextExtractor for PdfExtractor {
    async fn extract_text(&self, pdf: Bytes) -> Result<String, ValidationError> {
        let size = pdf.len();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
            .await
            .map_err(|e| ValidationError::pdf(format!("extraction task aborted: {e}")))?
            .map_err(|e| ValidationError::pdf(e.to_string()))?;

        debug!(size, chars = text.len(), "PDF text extracted");
        Ok(text)
    }
}
