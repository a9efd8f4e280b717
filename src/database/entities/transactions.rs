use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{entity::prelude::*, sea_query::StringLen};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Payment state of a transaction
///
/// The set is closed on purpose: dashboard aggregations derive paid revenue
/// as `total - unpaid`, which only holds while no third state exists.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "paid")]
    #[serde(rename = "paid")]
    Paid,
    #[sea_orm(string_value = "unpaid")]
    #[serde(rename = "unpaid")]
    Unpaid,
}

impl TransactionStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, TransactionStatus::Paid)
    }

    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Paid => "paid",
            TransactionStatus::Unpaid => "unpaid",
        }
    }

    /// Human-readable label used in dashboard breakdowns
    pub fn label(&self) -> &'static str {
        match self {
            TransactionStatus::Paid => "Paid",
            TransactionStatus::Unpaid => "Unpaid",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub patient_id: i32,
    pub service_type: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    pub transaction_date: DateTime<Utc>,
    #[sea_orm(column_type = "String(StringLen::N(16))")]
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Create a new transaction record for an existing patient
    pub fn new(
        patient_id: i32,
        service_type: impl Into<String>,
        amount: Decimal,
        transaction_date: DateTime<Utc>,
        status: TransactionStatus,
    ) -> Self {
        Self {
            id: 0, // Will be auto-assigned by database
            patient_id,
            service_type: service_type.into(),
            amount,
            transaction_date,
            status,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Builder method to set ID (for tests)
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}
