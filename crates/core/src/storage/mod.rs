//! Receipt file storage using Apache OpenDAL.
//!
//! Receipts uploaded by members live in vendor-agnostic object storage:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)
//!
//! Only removal is needed here: uploads go straight from the browser to the
//! provider.

mod config;
mod error;
mod service;

pub use config::StorageConfig;
pub use covenant_shared::config::StorageProvider;
pub use error::StorageError;
pub use service::ReceiptStorage;
