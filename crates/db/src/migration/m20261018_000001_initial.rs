//! Initial database migration.
//!
//! Creates the financial records, encounter registrations, access accounts
//! and notification subscribers tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: TREASURY
        // ============================================================
        db.execute_unprepared(FINANCIAL_RECORDS_SQL).await?;

        // ============================================================
        // PART 2: ENCOUNTER
        // ============================================================
        db.execute_unprepared(ENCOUNTER_REGISTRATIONS_SQL).await?;
        db.execute_unprepared(ACCESS_ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: NOTIFICATIONS
        // ============================================================
        db.execute_unprepared(NOTIFICATION_SUBSCRIBERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS notification_subscribers CASCADE;
            DROP TABLE IF EXISTS access_accounts CASCADE;
            DROP TABLE IF EXISTS encounter_registrations CASCADE;
            DROP TABLE IF EXISTS financial_records CASCADE;
            ",
        )
        .await?;
        Ok(())
    }
}

const FINANCIAL_RECORDS_SQL: &str = r"
-- Contributions submitted by members, with the uploaded receipt
CREATE TABLE financial_records (
    id TEXT PRIMARY KEY,
    kind TEXT NOT NULL,
    receipt_url TEXT,
    submitted_at TIMESTAMPTZ,
    status TEXT,
    extracted_amount NUMERIC(19, 4),
    validation_method TEXT,
    validated_at TIMESTAMPTZ,
    audited_by TEXT,
    rejection_reason TEXT,
    archived_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_amount_non_negative CHECK (extracted_amount IS NULL OR extracted_amount >= 0)
);

-- Index for the cleanup scan
CREATE INDEX idx_financial_records_receipt ON financial_records(submitted_at) WHERE receipt_url IS NOT NULL;
";

const ENCOUNTER_REGISTRATIONS_SQL: &str = r"
-- Encounter participants
CREATE TABLE encounter_registrations (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    controlled_medication TEXT,
    medication_times JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_medication_times_array CHECK (jsonb_typeof(medication_times) = 'array')
);

-- Index for the medication check
CREATE INDEX idx_encounter_registrations_medicated ON encounter_registrations(id)
    WHERE controlled_medication IS NOT NULL AND controlled_medication <> '';
";

const ACCESS_ACCOUNTS_SQL: &str = r"
-- Staff accounts and their encounter permissions
CREATE TABLE access_accounts (
    id TEXT PRIMARY KEY,
    display_name TEXT,
    encounter_permissions JSONB NOT NULL DEFAULT '[]'::jsonb,
    fcm_token TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_encounter_permissions_array CHECK (jsonb_typeof(encounter_permissions) = 'array')
);
";

const NOTIFICATION_SUBSCRIBERS_SQL: &str = r"
-- Devices subscribed to study announcements
CREATE TABLE notification_subscribers (
    token TEXT PRIMARY KEY,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";
