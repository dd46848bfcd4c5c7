//! Google Vision OCR client.

use async_trait::async_trait;
use covenant_core::receipt::{FetchedDocument, OcrService, TextAnnotation, ValidationError};
use covenant_shared::config::OcrConfig;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Calls the Vision `images:annotate` REST endpoint with `TEXT_DETECTION`.
///
/// The image is referenced by its source URL; Vision downloads it itself.
#[derive(Debug, Clone)]
pub struct VisionOcrClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl VisionOcrClient {
    /// Create a new client.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &OcrConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    error: Option<RpcStatus>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct RpcStatus {
    #[serde(default)]
    message: String,
}

/// Reads the text annotations out of an `images:annotate` response body.
///
/// A response without annotations yields an empty list; a per-image error
/// becomes `ValidationError::Ocr`.
pub fn parse_annotate_response(body: &str) -> Result<Vec<TextAnnotation>, ValidationError> {
    let parsed: AnnotateResponse = serde_json::from_str(body)
        .map_err(|e| ValidationError::ocr(format!("malformed response: {e}")))?;

    let Some(first) = parsed.responses.into_iter().next() else {
        return Ok(Vec::new());
    };
    if let Some(status) = first.error {
        return Err(ValidationError::ocr(status.message));
    }

    Ok(first
        .text_annotations
        .into_iter()
        .map(|a| TextAnnotation::new(a.description))
        .collect())
}

#[async_trait]
impl OcrService for VisionOcrClient {
    async fn detect_text(
        &self,
        document: &FetchedDocument,
    ) -> Result<Vec<TextAnnotation>, ValidationError> {
        let request = json!({
            "requests": [{
                "image": { "source": { "imageUri": document.source_url } },
                "features": [{ "type": "TEXT_DETECTION" }]
            }]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", &self.api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| ValidationError::ocr(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ValidationError::ocr(e.to_string()))?;
        if !status.is_success() {
            return Err(ValidationError::ocr(format!("HTTP {}: {body}", status.as_u16())));
        }

        let annotations = parse_annotate_response(&body)?;
        debug!(url = %document.source_url, regions = annotations.len(), "OCR completed");
        Ok(annotations)
    }
}
