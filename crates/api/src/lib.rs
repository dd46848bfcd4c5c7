//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes
//! - The `data` envelope extractor
//! - Error responses

pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use covenant_core::cleanup::ReceiptCleanup;
use covenant_core::notification::{MedicationReminder, StudyAnnouncer};
use covenant_core::receipt::ReceiptValidator;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Receipt validator.
    pub validator: Arc<ReceiptValidator>,
    /// Study announcement sender.
    pub announcer: Arc<StudyAnnouncer>,
    /// Medication reminder job.
    pub reminder: Arc<MedicationReminder>,
    /// Receipt cleanup job (optional, needs object storage).
    pub cleanup: Option<Arc<ReceiptCleanup>>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[cfg(test)]
mod test_support;
