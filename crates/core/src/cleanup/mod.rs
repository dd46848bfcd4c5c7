//! Scheduled removal of expired receipt files.
//!
//! Receipts are only needed until the treasury has reviewed them. Once a
//! receipt is past its retention window the file is deleted from storage and
//! the financial record is marked as archived.

mod policy;
mod service;

pub use policy::{RetentionPolicy, StoredReceipt, TITHE_KIND, receipt_file_name};
pub use service::{CleanupError, CleanupReport, ReceiptArchive, ReceiptCleanup, ReceiptObjectStore};
