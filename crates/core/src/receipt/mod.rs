//! Receipt (proof of payment) validation.
//!
//! This module decides whether an uploaded Pix receipt is genuine enough to
//! accept automatically:
//! - PDF receipts are read from their embedded text
//! - Images are sent to an OCR service
//! - The text must contain the configured CNPJ and a positive amount
//!
//! The decision is written onto the financial record the receipt belongs to.

mod amount;
mod error;
mod ports;
mod service;
mod text;
mod types;

pub use amount::{AMOUNT_LIMIT, AmountStrategy, FirstMatch, parse_brl};
pub use error::{StoreError, ValidationError};
pub use ports::{DocumentFetcher, FinancialRecordStore, OcrService, PdfTextExtractor};
pub use service::ReceiptValidator;
pub use text::NormalizedText;
pub use types::{
    AUTOMATIC_AUDITOR, ExtractedDocument, ExtractionMethod, FetchedDocument, FinancialRecord,
    RecordUpdate, RejectionReason, STATUS_APPROVED, STATUS_REJECTED,
    STATUS_TECHNICAL_ERROR_PREFIX, TextAnnotation, ValidationRequest, ValidationResult,
};
