//! In-memory collaborators for tests.
//!
//! Enabled for this crate's own tests and, through the `test-util` feature,
//! for downstream crates.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::cleanup::{ReceiptArchive, ReceiptObjectStore, StoredReceipt};
use crate::notification::{
    DeliveryReport, MedicatedRegistration, NotificationError, PushMessage, PushSender,
    RegistrationDirectory, SubscriberDirectory,
};
use crate::receipt::{
    DocumentFetcher, FetchedDocument, FinancialRecord, FinancialRecordStore, OcrService,
    PdfTextExtractor, RecordUpdate, StoreError, TextAnnotation, ValidationError,
};
use crate::storage::StorageError;

/// Takes one unit from a failure budget, returning true if one was left.
fn take_failure(budget: &Mutex<usize>) -> bool {
    let mut remaining = budget.lock().unwrap();
    if *remaining > 0 {
        *remaining -= 1;
        true
    } else {
        false
    }
}

/// Financial records kept in a map.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: Mutex<BTreeMap<String, FinancialRecord>>,
    failing_writes: Mutex<usize>,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a bare record of the given kind.
    pub fn insert_record(&self, id: &str, kind: &str) {
        self.put(FinancialRecord {
            id: id.to_string(),
            kind: kind.to_string(),
            ..FinancialRecord::default()
        });
    }

    /// Insert or replace a record.
    pub fn put(&self, record: FinancialRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record);
    }

    /// Snapshot of a record.
    #[must_use]
    pub fn record(&self, id: &str) -> Option<FinancialRecord> {
        self.records.lock().unwrap().get(id).cloned()
    }

    /// Make the next `count` calls to `apply` fail.
    pub fn fail_next_writes(&self, count: usize) {
        *self.failing_writes.lock().unwrap() = count;
    }
}

#[async_trait]
impl FinancialRecordStore for InMemoryRecordStore {
    async fn apply(&self, record_id: &str, update: &RecordUpdate) -> Result<(), StoreError> {
        if take_failure(&self.failing_writes) {
            return Err(StoreError::backend("write rejected"));
        }

        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(record_id)
            .ok_or_else(|| StoreError::NotFound(record_id.to_string()))?;
        update.apply_to(record);
        Ok(())
    }
}

#[async_trait]
impl ReceiptArchive for InMemoryRecordStore {
    async fn receipts_on_file(&self) -> Result<Vec<StoredReceipt>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter_map(|r| {
                r.receipt_url.as_ref().map(|url| StoredReceipt {
                    record_id: r.id.clone(),
                    kind: r.kind.clone(),
                    receipt_url: url.clone(),
                    submitted_at: r.submitted_at,
                })
            })
            .collect())
    }

    async fn mark_archived(&self, record_id: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(record_id)
            .ok_or_else(|| StoreError::NotFound(record_id.to_string()))?;
        record.receipt_url = None;
        record.archived_at = Some(at);
        Ok(())
    }
}

/// Receipt files kept as a set of names.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    files: Mutex<HashSet<String>>,
    failing: Mutex<HashSet<String>>,
}

impl InMemoryObjectStore {
    /// Create a store holding the given files.
    #[must_use]
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            files: Mutex::new(files.into_iter().map(Into::into).collect()),
            failing: Mutex::default(),
        }
    }

    /// Make removal of `file_name` fail.
    pub fn fail_on(&self, file_name: &str) {
        self.failing.lock().unwrap().insert(file_name.to_string());
    }

    /// Returns true if the file is still stored.
    #[must_use]
    pub fn contains(&self, file_name: &str) -> bool {
        self.files.lock().unwrap().contains(file_name)
    }
}

#[async_trait]
impl ReceiptObjectStore for InMemoryObjectStore {
    async fn remove(&self, file_name: &str) -> Result<(), StorageError> {
        if self.failing.lock().unwrap().contains(file_name) {
            return Err(StorageError::operation("provider unavailable"));
        }
        self.files.lock().unwrap().remove(file_name);
        Ok(())
    }
}

/// Records every push message; each token counts as delivered.
#[derive(Debug, Default)]
pub struct RecordingPushSender {
    messages: Mutex<Vec<PushMessage>>,
    failing: Mutex<usize>,
}

impl RecordingPushSender {
    /// Messages sent so far.
    #[must_use]
    pub fn messages(&self) -> Vec<PushMessage> {
        self.messages.lock().unwrap().clone()
    }

    /// Make the next `count` sends fail.
    pub fn fail_next(&self, count: usize) {
        *self.failing.lock().unwrap() = count;
    }
}

#[async_trait]
impl PushSender for RecordingPushSender {
    async fn send_each(&self, message: &PushMessage) -> Result<DeliveryReport, NotificationError> {
        if take_failure(&self.failing) {
            return Err(NotificationError::delivery("push provider unavailable"));
        }
        self.messages.lock().unwrap().push(message.clone());
        Ok(DeliveryReport {
            sent: message.tokens.len(),
            failed: 0,
        })
    }
}

/// Fixed list of subscriber tokens.
#[derive(Debug, Default)]
pub struct StaticSubscriberDirectory {
    tokens: Vec<String>,
    failing: bool,
}

impl StaticSubscriberDirectory {
    /// Create a directory with the given tokens.
    #[must_use]
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            failing: false,
        }
    }

    /// Create a directory whose lookups fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            tokens: Vec::new(),
            failing: true,
        }
    }
}

#[async_trait]
impl SubscriberDirectory for StaticSubscriberDirectory {
    async fn subscriber_tokens(&self) -> Result<Vec<String>, NotificationError> {
        if self.failing {
            return Err(NotificationError::directory("subscribers unavailable"));
        }
        Ok(self.tokens.clone())
    }
}

/// Fixed registrations and health team tokens.
#[derive(Debug, Default)]
pub struct StaticRegistrationDirectory {
    registrations: Vec<MedicatedRegistration>,
    team_tokens: Vec<String>,
}

impl StaticRegistrationDirectory {
    /// Create a directory.
    #[must_use]
    pub fn new(registrations: Vec<MedicatedRegistration>, team_tokens: Vec<String>) -> Self {
        Self {
            registrations,
            team_tokens,
        }
    }
}

#[async_trait]
impl RegistrationDirectory for StaticRegistrationDirectory {
    async fn medicated_registrations(&self) -> Result<Vec<MedicatedRegistration>, NotificationError> {
        Ok(self.registrations.clone())
    }

    async fn health_team_tokens(&self) -> Result<Vec<String>, NotificationError> {
        Ok(self.team_tokens.clone())
    }
}

/// Serves the same document for every URL.
#[derive(Debug)]
pub struct StaticDocumentFetcher {
    content_type: String,
    bytes: Bytes,
    calls: AtomicUsize,
}

impl StaticDocumentFetcher {
    /// Create a fetcher serving `bytes` as `content_type`.
    #[must_use]
    pub fn new(content_type: &str, bytes: &'static [u8]) -> Self {
        Self {
            content_type: content_type.to_string(),
            bytes: Bytes::from_static(bytes),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of downloads.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentFetcher for StaticDocumentFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument, ValidationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(FetchedDocument {
            source_url: url.to_string(),
            content_type: self.content_type.clone(),
            bytes: self.bytes.clone(),
        })
    }
}

/// Returns fixed text for every PDF.
#[derive(Debug)]
pub struct StaticPdfText {
    text: String,
    calls: AtomicUsize,
}

impl StaticPdfText {
    /// Create an extractor returning `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of extractions.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PdfTextExtractor for StaticPdfText {
    async fn extract_text(&self, _pdf: Bytes) -> Result<String, ValidationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

/// Returns fixed annotations for every image.
#[derive(Debug)]
pub struct StaticOcr {
    annotations: Vec<TextAnnotation>,
    calls: AtomicUsize,
}

impl StaticOcr {
    /// Create an OCR double returning one full-page annotation.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self::with_annotations(vec![TextAnnotation::new(text)])
    }

    /// Create an OCR double returning the given annotations.
    #[must_use]
    pub fn with_annotations(annotations: Vec<TextAnnotation>) -> Self {
        Self {
            annotations,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of OCR requests.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrService for StaticOcr {
    async fn detect_text(
        &self,
        _document: &FetchedDocument,
    ) -> Result<Vec<TextAnnotation>, ValidationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.annotations.clone())
    }
}
