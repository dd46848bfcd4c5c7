//! Bible study announcement routes.

use axum::{Json, Router, extract::State, routing::post};
use covenant_core::notification::DeliveryReport;
use covenant_shared::AppError;
use serde::Deserialize;
use tracing::info;

use crate::{AppState, error::ApiError, extract::Payload};

/// Creates the study routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/studies/announce", post(announce_study))
}

/// Request body for a study announcement.
#[derive(Debug, Deserialize)]
pub struct AnnounceStudyRequest {
    /// Title of the published study.
    #[serde(rename = "titulo")]
    pub title: String,
}

/// POST `/studies/announce`
async fn announce_study(
    State(state): State<AppState>,
    Payload(payload): Payload<AnnounceStudyRequest>,
) -> Result<Json<DeliveryReport>, ApiError> {
    let title = payload.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("titulo is required".into()).into());
    }

    info!(title = %title, "Announcing study");
    let report = state.announcer.announce(title).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use crate::test_support::TestApp;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_announce() {
        let app = TestApp::new();

        let (status, body) = app
            .post("/api/v1/studies/announce", &json!({"data": {"titulo": "Salmos 23"}}))
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"sent": 2, "failed": 0}));
        let sent = app.push.messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "Confira agora: \"Salmos 23\"");
    }

    #[tokio::test]
    async fn test_blank_title_is_bad_request() {
        let app = TestApp::new();

        let (status, _) = app
            .post("/api/v1/studies/announce", &json!({"titulo": "  "}))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(app.push.messages().is_empty());
    }
}
