//! Router harness backed by in-memory collaborators.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use covenant_core::cleanup::ReceiptCleanup;
use covenant_core::notification::{MedicationReminder, StudyAnnouncer};
use covenant_core::receipt::ReceiptValidator;
use covenant_core::testing::{
    InMemoryObjectStore, InMemoryRecordStore, RecordingPushSender, StaticDocumentFetcher, StaticOcr,
    StaticPdfText, StaticRegistrationDirectory, StaticSubscriberDirectory,
};
use covenant_shared::Cnpj;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::{AppState, create_router};

/// Receipt text with the official CNPJ and an amount of 1234.56.
pub const OFFICIAL_RECEIPT: &str =
    "Comprovante Pix\nDestino CNPJ 33.206.513/0001-02\nValor R$ 1.234,56";

pub struct TestApp {
    pub records: Arc<InMemoryRecordStore>,
    pub push: Arc<RecordingPushSender>,
    state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_pdf_text("")
    }

    /// Every receipt is a PDF whose text layer is `text`.
    pub fn with_pdf_text(text: &str) -> Self {
        let records = Arc::new(InMemoryRecordStore::new());
        let push = Arc::new(RecordingPushSender::default());

        let validator = ReceiptValidator::new(
            Arc::new(StaticDocumentFetcher::new("application/pdf", b"%PDF-1.4")),
            Arc::new(StaticPdfText::new(text)),
            Arc::new(StaticOcr::with_annotations(Vec::new())),
            records.clone(),
            Cnpj::OFFICIAL,
        );
        let announcer = StudyAnnouncer::new(
            Arc::new(StaticSubscriberDirectory::new(vec![
                "t1".to_string(),
                "t2".to_string(),
            ])),
            push.clone(),
        );
        let reminder = MedicationReminder::new(
            Arc::new(StaticRegistrationDirectory::default()),
            push.clone(),
            chrono_tz::America::Sao_Paulo,
        );

        Self {
            records,
            push,
            state: AppState {
                validator: Arc::new(validator),
                announcer: Arc::new(announcer),
                reminder: Arc::new(reminder),
                cleanup: None,
            },
        }
    }

    /// Enables the cleanup job over an object store holding `files`.
    pub fn with_cleanup<const N: usize>(mut self, files: [&str; N]) -> Self {
        let objects = Arc::new(InMemoryObjectStore::with_files(files));
        self.state.cleanup = Some(Arc::new(ReceiptCleanup::new(self.records.clone(), objects)));
        self
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.post_raw(uri, &body.to_string()).await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = create_router(self.state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}
