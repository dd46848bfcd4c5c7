//! Receipt validation error types.

use thiserror::Error;

/// Record store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with the given key.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The backing store rejected the operation.
    #[error("record store failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a backend error.
    #[must_use]
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Technical failures while validating a receipt.
///
/// A rejected receipt is not an error; see `ValidationResult`.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The document could not be downloaded.
    #[error("download failed: {0}")]
    Download(String),

    /// The document server answered with a non-success status.
    #[error("download failed with HTTP status {status}")]
    DownloadStatus {
        /// HTTP status code.
        status: u16,
    },

    /// The PDF could not be parsed.
    #[error("PDF text extraction failed: {0}")]
    PdfExtraction(String),

    /// The OCR service call failed.
    #[error("OCR request failed: {0}")]
    Ocr(String),

    /// The OCR service found no text in the image.
    #[error("OCR detected no text in the image")]
    NoTextDetected,

    /// The decision could not be written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ValidationError {
    /// Create a download error.
    #[must_use]
    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }

    /// Create an OCR error.
    #[must_use]
    pub fn ocr(msg: impl Into<String>) -> Self {
        Self::Ocr(msg.into())
    }

    /// Create a PDF extraction error.
    #[must_use]
    pub fn pdf(msg: impl Into<String>) -> Self {
        Self::PdfExtraction(msg.into())
    }
}
