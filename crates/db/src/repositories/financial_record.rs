//! Financial record repository for database operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use covenant_core::cleanup::{ReceiptArchive, StoredReceipt};
use covenant_core::receipt::{FinancialRecord, FinancialRecordStore, RecordUpdate, StoreError};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use crate::entities::financial_records;

/// Financial record repository.
#[derive(Debug)]
pub struct FinancialRecordRepository {
    db: DatabaseConnection,
}

impl FinancialRecordRepository {
    /// Creates a new financial record repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a record by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<FinancialRecord>, DbErr> {
        Ok(financial_records::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(into_record))
    }
}

/// Builds the partial row update for `update`.
///
/// Only the columns the update owns are marked as set.
pub fn update_model(record_id: &str, update: &RecordUpdate) -> financial_records::ActiveModel {
    let mut scratch = FinancialRecord::default();
    update.apply_to(&mut scratch);

    let mut model = financial_records::ActiveModel {
        id: Unchanged(record_id.to_string()),
        status: Set(scratch.status),
        ..Default::default()
    };

    if matches!(update, RecordUpdate::Decision { .. }) {
        model.extracted_amount = Set(scratch.extracted_amount);
        model.validation_method = Set(scratch.validation_method);
        model.validated_at = Set(scratch.validated_at.map(Into::into));
        model.audited_by = Set(scratch.audited_by);
        model.rejection_reason = Set(scratch.rejection_reason);
    }

    model
}

/// Converts a row into the domain record.
pub fn into_record(model: financial_records::Model) -> FinancialRecord {
    FinancialRecord {
        id: model.id,
        kind: model.kind,
        receipt_url: model.receipt_url,
        submitted_at: model.submitted_at.map(|t| t.with_timezone(&Utc)),
        status: model.status,
        extracted_amount: model.extracted_amount,
        validation_method: model.validation_method,
        validated_at: model.validated_at.map(|t| t.with_timezone(&Utc)),
        audited_by: model.audited_by,
        rejection_reason: model.rejection_reason,
        archived_at: model.archived_at.map(|t| t.with_timezone(&Utc)),
    }
}

fn store_error(record_id: &str, err: DbErr) -> StoreError {
    match err {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => {
            StoreError::NotFound(record_id.to_string())
        }
        other => StoreError::backend(other.to_string()),
    }
}

#[async_trait]
impl FinancialRecordStore for FinancialRecordRepository {
    async fn apply(&self, record_id: &str, update: &RecordUpdate) -> Result<(), StoreError> {
        update_model(record_id, update)
            .update(&self.db)
            .await
            .map_err(|e| store_error(record_id, e))?;

        debug!(record_id = %record_id, status = %update.status(), "Financial record updated");
        Ok(())
    }
}

#[async_trait]
impl ReceiptArchive for FinancialRecordRepository {
    async fn receipts_on_file(&self) -> Result<Vec<StoredReceipt>, StoreError> {
        let rows = financial_records::Entity::find()
            .filter(financial_records::Column::ReceiptUrl.is_not_null())
            .order_by_asc(financial_records::Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let receipt_url = row.receipt_url?;
                Some(StoredReceipt {
                    record_id: row.id,
                    kind: row.kind,
                    receipt_url,
                    submitted_at: row.submitted_at.map(|t| t.with_timezone(&Utc)),
                })
            })
            .collect())
    }

    async fn mark_archived(&self, record_id: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        financial_records::ActiveModel {
            id: Unchanged(record_id.to_string()),
            receipt_url: Set(None),
            archived_at: Set(Some(at.into())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| store_error(record_id, e))?;

        Ok(())
    }
}
