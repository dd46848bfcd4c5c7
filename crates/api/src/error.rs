//! Error responses.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use covenant_core::cleanup::CleanupError;
use covenant_core::notification::NotificationError;
use covenant_shared::AppError;
use serde_json::json;
use tracing::error;

/// An `AppError` rendered as `{error, message}` with its HTTP status.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        let message = match &self.0 {
            AppError::Validation(m)
            | AppError::Unavailable(m)
            | AppError::Database(m)
            | AppError::ExternalService(m) => m.clone(),
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code().to_ascii_lowercase(),
                "message": message
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::Validation(rejection.body_text()))
    }
}

impl From<NotificationError> for ApiError {
    fn from(err: NotificationError) -> Self {
        Self(match err {
            NotificationError::Directory(m) => AppError::Database(m),
            NotificationError::Delivery(m) => AppError::ExternalService(m),
        })
    }
}

impl From<CleanupError> for ApiError {
    fn from(err: CleanupError) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}
