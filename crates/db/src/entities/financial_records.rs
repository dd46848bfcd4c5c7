//! `SeaORM` Entity for financial_records table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "financial_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub receipt_url: Option<String>,
    pub submitted_at: Option<DateTimeWithTimeZone>,
    pub status: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))", nullable)]
    pub extracted_amount: Option<Decimal>,
    pub validation_method: Option<String>,
    pub validated_at: Option<DateTimeWithTimeZone>,
    pub audited_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub archived_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
