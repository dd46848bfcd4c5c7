//! Core business logic for Covenant.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! External systems are reached through traits implemented by the adapters and
//! db crates.
//!
//! # Modules
//!
//! - `receipt` - Pix receipt validation (PDF text or OCR, CNPJ and amount matching)
//! - `cleanup` - Removal of expired receipt files
//! - `notification` - Study announcements and medication reminders
//! - `storage` - Receipt object storage via OpenDAL

pub mod cleanup;
pub mod notification;
pub mod receipt;
pub mod storage;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;
