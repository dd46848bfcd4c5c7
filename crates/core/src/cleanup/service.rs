//! Receipt cleanup job.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use super::policy::{RetentionPolicy, StoredReceipt, receipt_file_name};
use crate::receipt::StoreError;
use crate::storage::StorageError;

/// Financial records as seen by the cleanup job.
#[async_trait]
pub trait ReceiptArchive: Send + Sync {
    /// Records that still reference a receipt file.
    async fn receipts_on_file(&self) -> Result<Vec<StoredReceipt>, StoreError>;

    /// Clears the receipt URL and stamps the archive time.
    async fn mark_archived(&self, record_id: &str, at: DateTime<Utc>) -> Result<(), StoreError>;
}

/// Where receipt files live.
#[async_trait]
pub trait ReceiptObjectStore: Send + Sync {
    /// Deletes the file with the given name.
    async fn remove(&self, file_name: &str) -> Result<(), StorageError>;
}

/// Errors that abort a cleanup run.
#[derive(Debug, Error)]
pub enum CleanupError {
    /// The records could not be listed.
    #[error("failed to list receipts: {0}")]
    Listing(#[from] StoreError),
}

/// Why a single receipt could not be archived.
#[derive(Debug, Error)]
enum ArchiveFailure {
    #[error("receipt URL has no file name: {0}")]
    NoFileName(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a cleanup run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Records holding a receipt.
    pub scanned: usize,
    /// Records without a submission date.
    pub skipped: usize,
    /// Receipts deleted and archived.
    pub removed: usize,
    /// Expired receipts that could not be archived.
    pub failed: usize,
}

/// Deletes expired receipt files and archives their records.
pub struct ReceiptCleanup {
    archive: Arc<dyn ReceiptArchive>,
    objects: Arc<dyn ReceiptObjectStore>,
    policy: RetentionPolicy,
}

impl ReceiptCleanup {
    /// Create a new cleanup job with the default retention policy.
    #[must_use]
    pub fn new(archive: Arc<dyn ReceiptArchive>, objects: Arc<dyn ReceiptObjectStore>) -> Self {
        Self {
            archive,
            objects,
            policy: RetentionPolicy::default(),
        }
    }

    /// Replace the retention policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RetentionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run one cleanup pass.
    ///
    /// Records are processed one at a time; a failure on one record is
    /// logged and counted and the pass continues.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<CleanupReport, CleanupError> {
        let receipts = self.archive.receipts_on_file().await?;
        info!(count = receipts.len(), "Starting receipt cleanup");

        let mut report = CleanupReport {
            scanned: receipts.len(),
            ..CleanupReport::default()
        };

        for receipt in &receipts {
            if receipt.submitted_at.is_none() {
                report.skipped += 1;
                continue;
            }
            if !self.policy.is_expired(receipt, now) {
                continue;
            }

            match self.archive_receipt(receipt, now).await {
                Ok(()) => {
                    info!(
                        record_id = %receipt.record_id,
                        kind = %receipt.kind,
                        "Receipt file removed"
                    );
                    report.removed += 1;
                }
                Err(e) => {
                    error!(record_id = %receipt.record_id, error = %e, "Failed to remove receipt");
                    report.failed += 1;
                }
            }
        }

        if report.failed > 0 {
            warn!(failed = report.failed, "Receipt cleanup finished with failures");
        }
        info!(
            scanned = report.scanned,
            removed = report.removed,
            skipped = report.skipped,
            "Receipt cleanup finished"
        );

        Ok(report)
    }

    async fn archive_receipt(
        &self,
        receipt: &StoredReceipt,
        now: DateTime<Utc>,
    ) -> Result<(), ArchiveFailure> {
        let file_name = receipt_file_name(&receipt.receipt_url)
            .ok_or_else(|| ArchiveFailure::NoFileName(receipt.receipt_url.clone()))?;

        self.objects.remove(file_name).await?;
        self.archive.mark_archived(&receipt.record_id, now).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::FinancialRecord;
    use crate::testing::{InMemoryObjectStore, InMemoryRecordStore};
    use chrono::Duration;

    fn record(id: &str, kind: &str, file: &str, age: Option<Duration>, now: DateTime<Utc>) -> FinancialRecord {
        FinancialRecord {
            id: id.to_string(),
            kind: kind.to_string(),
            receipt_url: Some(format!("https://files.example/comprovantes/{file}")),
            submitted_at: age.map(|a| now - a),
            ..FinancialRecord::default()
        }
    }

    #[tokio::test]
    async fn test_removes_only_expired_receipts() {
        let now = Utc::now();
        let records = Arc::new(InMemoryRecordStore::new());
        records.put(record("tithe-old", "Dízimo", "t1.pdf", Some(Duration::hours(200)), now));
        records.put(record("tithe-new", "Dízimo", "t2.pdf", Some(Duration::hours(100)), now));
        records.put(record("offer-old", "Oferta", "o1.png", Some(Duration::hours(30)), now));
        records.put(record("offer-new", "Oferta", "o2.png", Some(Duration::hours(2)), now));
        records.put(record("undated", "Oferta", "u1.png", None, now));

        let objects = Arc::new(InMemoryObjectStore::with_files([
            "t1.pdf", "t2.pdf", "o1.png", "o2.png", "u1.png",
        ]));

        let cleanup = ReceiptCleanup::new(records.clone(), objects.clone());
        let report = cleanup.run(now).await.expect("cleanup runs");

        assert_eq!(
            report,
            CleanupReport {
                scanned: 5,
                skipped: 1,
                removed: 2,
                failed: 0,
            }
        );
        assert!(!objects.contains("t1.pdf"));
        assert!(!objects.contains("o1.png"));
        assert!(objects.contains("t2.pdf"));
        assert!(objects.contains("o2.png"));
        assert!(objects.contains("u1.png"));

        let archived = records.record("tithe-old").unwrap();
        assert_eq!(archived.receipt_url, None);
        assert_eq!(archived.archived_at, Some(now));
        assert!(records.record("tithe-new").unwrap().receipt_url.is_some());
    }

    #[tokio::test]
    async fn test_failure_on_one_record_does_not_stop_the_run() {
        let now = Utc::now();
        let records = Arc::new(InMemoryRecordStore::new());
        records.put(record("a", "Oferta", "a.png", Some(Duration::hours(48)), now));
        records.put(record("b", "Oferta", "b.png", Some(Duration::hours(48)), now));

        let objects = Arc::new(InMemoryObjectStore::with_files(["a.png", "b.png"]));
        objects.fail_on("a.png");

        let report = ReceiptCleanup::new(records.clone(), objects.clone())
            .run(now)
            .await
            .expect("cleanup runs");

        assert_eq!(report.removed, 1);
        assert_eq!(report.failed, 1);
        // A failed deletion leaves the record untouched.
        assert!(records.record("a").unwrap().receipt_url.is_some());
        assert!(records.record("b").unwrap().receipt_url.is_none());
    }

    #[tokio::test]
    async fn test_url_without_file_name_counts_as_failure() {
        let now = Utc::now();
        let records = Arc::new(InMemoryRecordStore::new());
        let mut broken = record("broken", "Oferta", "", Some(Duration::hours(48)), now);
        broken.receipt_url = Some("https://files.example/comprovantes/".to_string());
        records.put(broken);

        let report = ReceiptCleanup::new(records, Arc::new(InMemoryObjectStore::default()))
            .run(now)
            .await
            .expect("cleanup runs");

        assert_eq!(report.failed, 1);
        assert_eq!(report.removed, 0);
    }

    #[tokio::test]
    async fn test_custom_policy() {
        let now = Utc::now();
        let records = Arc::new(InMemoryRecordStore::new());
        records.put(record("a", "Oferta", "a.png", Some(Duration::hours(2)), now));
        let objects = Arc::new(InMemoryObjectStore::with_files(["a.png"]));

        let policy = RetentionPolicy {
            tithe: Duration::hours(2),
            default: Duration::hours(1),
        };
        let report = ReceiptCleanup::new(records, objects)
            .with_policy(policy)
            .run(now)
            .await
            .expect("cleanup runs");

        assert_eq!(report.removed, 1);
    }
}
