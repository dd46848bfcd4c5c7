//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod jobs;
pub mod receipts;
pub mod studies;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(receipts::routes())
        .merge(studies::routes())
        .merge(jobs::routes())
}
