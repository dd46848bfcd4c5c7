//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod encounter;
pub mod financial_record;
pub mod subscriber;

pub use encounter::EncounterRepository;
pub use financial_record::FinancialRecordRepository;
pub use subscriber::SubscriberRepository;
