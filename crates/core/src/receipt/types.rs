//! Receipt validation domain types.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Status written when a receipt is approved.
pub const STATUS_APPROVED: &str = "Aprovado via OCR/PDF";

/// Status written when a receipt is rejected.
pub const STATUS_REJECTED: &str = "Rejeitado: Dados divergentes";

/// Prefix of the status written when validation fails for technical reasons.
pub const STATUS_TECHNICAL_ERROR_PREFIX: &str = "Erro Técnico: ";

/// Auditor recorded on automatically approved receipts.
pub const AUTOMATIC_AUDITOR: &str = "Sistema Automático (Híbrido)";

/// A request to validate the receipt attached to a financial record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// Where the receipt can be downloaded from.
    pub download_url: String,
    /// Key of the financial record that receives the decision.
    pub record_id: String,
}

impl ValidationRequest {
    /// Creates a new validation request.
    #[must_use]
    pub fn new(download_url: impl Into<String>, record_id: impl Into<String>) -> Self {
        Self {
            download_url: download_url.into(),
            record_id: record_id.into(),
        }
    }
}

/// A downloaded document, before text extraction.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// URL the document was downloaded from.
    pub source_url: String,
    /// Declared `Content-Type`, empty when the server sent none.
    pub content_type: String,
    /// Raw body.
    pub bytes: Bytes,
}

impl FetchedDocument {
    /// Returns true when the declared media type is `application/pdf`.
    ///
    /// Parameters such as `; charset=binary` are ignored.
    #[must_use]
    pub fn is_pdf(&self) -> bool {
        self.content_type
            .split(';')
            .next()
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/pdf"))
    }
}

/// A single text region reported by the OCR service.
///
/// The first annotation of a response covers the full page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAnnotation {
    /// Recognized text.
    pub description: String,
}

impl TextAnnotation {
    /// Creates a new annotation.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// How the text of a receipt was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Text embedded in the PDF structure.
    PdfText,
    /// Optical character recognition on an image.
    OcrVision,
}

impl ExtractionMethod {
    /// Label persisted on the financial record.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PdfText => "PDF Parse",
            Self::OcrVision => "Google Vision",
        }
    }
}

/// Text extracted from a receipt.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Extracted text, line breaks preserved.
    pub raw_text: String,
    /// Declared content type of the source document.
    pub content_type: String,
    /// Strategy that produced the text.
    pub method: ExtractionMethod,
}

/// Why a receipt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// The configured CNPJ does not appear in the receipt.
    IdentifierNotFound,
    /// No positive amount could be read.
    AmountUnreadable,
}

impl RejectionReason {
    /// Label persisted on the financial record.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::IdentifierNotFound => "CNPJ não encontrado",
            Self::AmountUnreadable => "Valor ilegível",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdentifierNotFound => f.write_str("identifier not found"),
            Self::AmountUnreadable => f.write_str("amount unreadable"),
        }
    }
}

/// The decision reached for a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Whether the receipt was accepted.
    pub approved: bool,
    /// Amount read from the receipt, zero when none was found.
    pub extracted_amount: Decimal,
    /// Strategy that produced the text.
    pub method: ExtractionMethod,
    /// Set when `approved` is false.
    pub rejection_reason: Option<RejectionReason>,
}

/// A financial record as held by the record store.
///
/// Records are created elsewhere; validation and cleanup only touch the
/// fields they own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinancialRecord {
    /// Record key.
    pub id: String,
    /// Contribution kind, e.g. `Dízimo` or `Oferta`.
    pub kind: String,
    /// Public URL of the uploaded receipt, cleared once archived.
    pub receipt_url: Option<String>,
    /// When the contribution was submitted.
    pub submitted_at: Option<DateTime<Utc>>,
    /// Free-form status shown to the treasury.
    pub status: Option<String>,
    /// Amount read from the receipt.
    pub extracted_amount: Option<Decimal>,
    /// Label of the extraction strategy.
    pub validation_method: Option<String>,
    /// When the decision was recorded.
    pub validated_at: Option<DateTime<Utc>>,
    /// Who validated the receipt.
    pub audited_by: Option<String>,
    /// Label of the rejection reason.
    pub rejection_reason: Option<String>,
    /// When the receipt file was removed from storage.
    pub archived_at: Option<DateTime<Utc>>,
}

/// A partial update written onto a financial record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordUpdate {
    /// Overwrites every decision field.
    Decision {
        /// The decision.
        result: ValidationResult,
        /// When it was reached.
        decided_at: DateTime<Utc>,
    },
    /// Overwrites the status only.
    TechnicalError {
        /// Error description appended to the status.
        message: String,
    },
}

impl RecordUpdate {
    /// Creates a decision update.
    #[must_use]
    pub fn decision(result: ValidationResult, decided_at: DateTime<Utc>) -> Self {
        Self::Decision { result, decided_at }
    }

    /// Creates a technical-error update.
    #[must_use]
    pub fn technical_error(message: impl Into<String>) -> Self {
        Self::TechnicalError {
            message: message.into(),
        }
    }

    /// Status value this update writes.
    #[must_use]
    pub fn status(&self) -> String {
        match self {
            Self::Decision { result, .. } if result.approved => STATUS_APPROVED.to_string(),
            Self::Decision { .. } => STATUS_REJECTED.to_string(),
            Self::TechnicalError { message } => format!("{STATUS_TECHNICAL_ERROR_PREFIX}{message}"),
        }
    }

    /// Merges the update into `record`, leaving fields it does not own untouched.
    pub fn apply_to(&self, record: &mut FinancialRecord) {
        record.status = Some(self.status());

        if let Self::Decision { result, decided_at } = self {
            record.extracted_amount = result.approved.then_some(result.extracted_amount);
            record.validation_method = Some(result.method.label().to_string());
            record.validated_at = Some(*decided_at);
            record.audited_by = result
                .approved
                .then(|| AUTOMATIC_AUDITOR.to_string());
            record.rejection_reason = result.rejection_reason.map(|r| r.label().to_string());
        }
    }
}
