//! Receipt validation routes.

use axum::{Json, Router, extract::State, routing::post};
use covenant_core::receipt::ValidationRequest;
use covenant_shared::AppError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError, extract::Payload};

/// Message returned when a receipt is judged and rejected.
pub const REJECTED_MESSAGE: &str = "CNPJ ou valor não identificados.";

/// Creates the receipt routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/receipts/validate", post(validate_receipt))
}

/// Request body for receipt validation.
#[derive(Debug, Deserialize)]
pub struct ValidateReceiptRequest {
    /// Public URL of the uploaded receipt.
    #[serde(rename = "downloadUrl")]
    pub download_url: String,
    /// Financial record that receives the decision.
    #[serde(rename = "registroId")]
    pub record_id: String,
}

/// Validation outcome as seen by the client.
#[derive(Debug, Serialize)]
pub struct ValidateReceiptResponse {
    /// Whether the receipt was approved.
    pub success: bool,
    /// Amount read from an approved receipt.
    #[serde(
        rename = "valor",
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub amount: Option<Decimal>,
    /// Why the receipt was not approved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST `/receipts/validate`
///
/// Judgement and technical failures are both reported with status 200 and
/// `success: false`; only an unusable request body is a client error.
async fn validate_receipt(
    State(state): State<AppState>,
    Payload(payload): Payload<ValidateReceiptRequest>,
) -> Result<Json<ValidateReceiptResponse>, ApiError> {
    if payload.download_url.trim().is_empty() || payload.record_id.trim().is_empty() {
        return Err(AppError::Validation("downloadUrl and registroId are required".into()).into());
    }

    let request = ValidationRequest::new(payload.download_url, payload.record_id);
    let response = match state.validator.validate(&request).await {
        Ok(result) if result.approved => ValidateReceiptResponse {
            success: true,
            amount: Some(result.extracted_amount),
            error: None,
        },
        Ok(_) => ValidateReceiptResponse {
            success: false,
            amount: None,
            error: Some(REJECTED_MESSAGE.to_string()),
        },
        Err(e) => ValidateReceiptResponse {
            success: false,
            amount: None,
            error: Some(e.to_string()),
        },
    };

    Ok(Json(response))
}
