//! `SeaORM` entity definitions.

pub mod access_accounts;
pub mod encounter_registrations;
pub mod financial_records;
pub mod notification_subscribers;
