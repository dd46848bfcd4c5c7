//! Manual triggers for the scheduled jobs.

use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;
use covenant_core::cleanup::CleanupReport;
use covenant_core::notification::ReminderReport;
use covenant_shared::AppError;

use crate::{AppState, error::ApiError};

/// Creates the job routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/jobs/medication-check", post(medication_check))
        .route("/jobs/receipt-cleanup", post(receipt_cleanup))
}

/// POST `/jobs/medication-check`
async fn medication_check(State(state): State<AppState>) -> Result<Json<ReminderReport>, ApiError> {
    let report = state.reminder.run(Utc::now()).await?;
    Ok(Json(report))
}

/// POST `/jobs/receipt-cleanup`
async fn receipt_cleanup(State(state): State<AppState>) -> Result<Json<CleanupReport>, ApiError> {
    let Some(cleanup) = &state.cleanup else {
        return Err(AppError::Unavailable("receipt storage is not configured".into()).into());
    };

    let report = cleanup.run(Utc::now()).await?;
    Ok(Json(report))
}
