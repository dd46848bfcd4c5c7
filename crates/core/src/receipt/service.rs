//! Receipt validator.

use std::sync::Arc;

use chrono::Utc;
use covenant_shared::Cnpj;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use super::amount::{AmountStrategy, FirstMatch};
use super::error::ValidationError;
use super::ports::{DocumentFetcher, FinancialRecordStore, OcrService, PdfTextExtractor};
use super::text::NormalizedText;
use super::types::{
    ExtractedDocument, ExtractionMethod, FetchedDocument, RecordUpdate, RejectionReason,
    ValidationRequest, ValidationResult,
};

/// Validates payment receipts and records the decision.
///
/// PDFs are read from their embedded text; any other content type goes
/// through OCR. A receipt is approved when it shows the configured CNPJ and a
/// positive amount.
pub struct ReceiptValidator {
    fetcher: Arc<dyn DocumentFetcher>,
    pdf: Arc<dyn PdfTextExtractor>,
    ocr: Arc<dyn OcrService>,
    store: Arc<dyn FinancialRecordStore>,
    amounts: Arc<dyn AmountStrategy>,
    cnpj: Cnpj,
}

impl ReceiptValidator {
    /// Create a new validator using the first-match amount strategy.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        pdf: Arc<dyn PdfTextExtractor>,
        ocr: Arc<dyn OcrService>,
        store: Arc<dyn FinancialRecordStore>,
        cnpj: Cnpj,
    ) -> Self {
        Self {
            fetcher,
            pdf,
            ocr,
            store,
            amounts: Arc::new(FirstMatch),
            cnpj,
        }
    }

    /// Replace the amount extraction strategy.
    #[must_use]
    pub fn with_amount_strategy(mut self, strategy: Arc<dyn AmountStrategy>) -> Self {
        self.amounts = strategy;
        self
    }

    /// Validate the receipt at `request.download_url` and record the decision.
    ///
    /// A rejected receipt is `Ok` with `approved == false`. `Err` means the
    /// receipt could not be judged or the decision could not be written; in
    /// both cases a technical-error status has already been attempted on the
    /// record.
    pub async fn validate(
        &self,
        request: &ValidationRequest,
    ) -> Result<ValidationResult, ValidationError> {
        let outcome = match self.evaluate(&request.download_url).await {
            Ok(result) => self.record_decision(&request.record_id, result).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(result) => {
                info!(
                    record_id = %request.record_id,
                    approved = result.approved,
                    amount = %result.extracted_amount,
                    method = result.method.label(),
                    "Receipt validated"
                );
                Ok(result)
            }
            Err(err) => {
                error!(record_id = %request.record_id, error = %err, "Receipt validation failed");
                self.record_technical_error(&request.record_id, &err).await;
                Err(err)
            }
        }
    }

    /// Download, extract and judge a receipt without touching the store.
    pub async fn evaluate(&self, download_url: &str) -> Result<ValidationResult, ValidationError> {
        let document = self.fetcher.fetch(download_url).await?;
        let extracted = self.extract(document).await?;
        Ok(self.judge(&extracted))
    }

    /// Judge extracted text.
    #[must_use]
    pub fn judge(&self, document: &ExtractedDocument) -> ValidationResult {
        let text = NormalizedText::from_raw(&document.raw_text);
        let identifier_found = self.cnpj.is_contained_in(&text.digits);
        let amount = self.amounts.extract(&text.words).unwrap_or(Decimal::ZERO);

        debug!(
            identifier_found,
            amount = %amount,
            strategy = self.amounts.name(),
            "Receipt text matched"
        );

        let rejection_reason = if !identifier_found {
            Some(RejectionReason::IdentifierNotFound)
        } else if amount <= Decimal::ZERO {
            Some(RejectionReason::AmountUnreadable)
        } else {
            None
        };

        ValidationResult {
            approved: rejection_reason.is_none(),
            extracted_amount: amount,
            method: document.method,
            rejection_reason,
        }
    }

    async fn extract(&self, document: FetchedDocument) -> Result<ExtractedDocument, ValidationError> {
        debug!(
            url = %document.source_url,
            content_type = %document.content_type,
            size = document.bytes.len(),
            "Extracting receipt text"
        );

        if document.is_pdf() {
            let raw_text = self.pdf.extract_text(document.bytes.clone()).await?;
            return Ok(ExtractedDocument {
                raw_text,
                content_type: document.content_type,
                method: ExtractionMethod::PdfText,
            });
        }

        let annotations = self.ocr.detect_text(&document).await?;
        let full_page = annotations
            .into_iter()
            .next()
            .ok_or(ValidationError::NoTextDetected)?;

        Ok(ExtractedDocument {
            raw_text: full_page.description,
            content_type: document.content_type,
            method: ExtractionMethod::OcrVision,
        })
    }

    async fn record_decision(
        &self,
        record_id: &str,
        result: ValidationResult,
    ) -> Result<ValidationResult, ValidationError> {
        let update = RecordUpdate::decision(result.clone(), Utc::now());
        self.store.apply(record_id, &update).await?;
        Ok(result)
    }

    /// Best effort: a failure here is logged and dropped.
    async fn record_technical_error(&self, record_id: &str, err: &ValidationError) {
        let update = RecordUpdate::technical_error(err.to_string());
        if let Err(store_err) = self.store.apply(record_id, &update).await {
            warn!(
                record_id = %record_id,
                error = %store_err,
                "Failed to record technical error status"
            );
        }
    }
}
