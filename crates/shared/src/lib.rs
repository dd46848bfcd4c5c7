//! Shared types, errors, and configuration for Covenant.
//!
//! This crate provides common types used across all other crates:
//! - The CNPJ tax identifier used to accept payment receipts
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::AppError;
pub use types::Cnpj;
