//! Common types used across the application.

pub mod cnpj;

pub use cnpj::Cnpj;
