use crate::database::entities::{TransactionRecord, TransactionStatus, transactions};
use crate::database::{DatabaseError, DatabaseResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

/// Transaction query parameters
#[derive(Debug, Default, Clone)]
pub struct TransactionQuery {
    pub patient_id: Option<i32>,
    pub status: Option<TransactionStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Mutable fields of a transaction record
#[derive(Debug, Default, Clone)]
pub struct TransactionUpdate {
    pub patient_id: Option<i32>,
    pub service_type: Option<String>,
    pub amount: Option<Decimal>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub status: Option<TransactionStatus>,
}

/// Transactions DAO for database operations
#[derive(Clone)]
pub struct TransactionsDao {
    db: DatabaseConnection,
}

impl TransactionsDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Store a transaction record, returning the persisted row
    ///
    /// The caller is responsible for having validated the patient reference.
    pub async fn insert(&self, record: &TransactionRecord) -> DatabaseResult<TransactionRecord> {
        let active_model = transactions::ActiveModel {
            id: ActiveValue::NotSet, // Let database auto-assign ID
            patient_id: Set(record.patient_id),
            service_type: Set(record.service_type.clone()),
            amount: Set(record.amount),
            transaction_date: Set(record.transaction_date),
            status: Set(record.status),
            created_at: Set(record.created_at),
            updated_at: Set(record.updated_at),
        };

        let inserted = active_model
            .insert(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(inserted)
    }

    /// Find transaction by ID
    pub async fn find_by_id(&self, id: i32) -> DatabaseResult<Option<TransactionRecord>> {
        let record = transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(record)
    }

    /// Get transaction records with filtering
    ///
    /// This is the snapshot read behind every analytics path; date bounds are
    /// inclusive on both ends.
    pub async fn get_records(
        &self,
        query: &TransactionQuery,
    ) -> DatabaseResult<Vec<TransactionRecord>> {
        let mut select = transactions::Entity::find();

        // Apply filters
        if let Some(patient_id) = query.patient_id {
            select = select.filter(transactions::Column::PatientId.eq(patient_id));
        }
        if let Some(status) = query.status {
            select = select.filter(transactions::Column::Status.eq(status));
        }
        if let Some(start_date) = query.start_date {
            select = select.filter(transactions::Column::TransactionDate.gte(start_date));
        }
        if let Some(end_date) = query.end_date {
            select = select.filter(transactions::Column::TransactionDate.lte(end_date));
        }

        // Apply ordering and pagination
        select = select.order_by_desc(transactions::Column::TransactionDate);

        if let Some(limit) = query.limit {
            select = select.limit(Some(limit as u64));
        }
        if let Some(offset) = query.offset {
            select = select.offset(Some(offset as u64));
        }

        let records = select
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(records)
    }

    /// Update mutable fields, stamping `updated_at`
    ///
    /// Patient-reference validation on change is the caller's job, matching
    /// creation.
    pub async fn update(
        &self,
        id: i32,
        changes: &TransactionUpdate,
    ) -> DatabaseResult<TransactionRecord> {
        let mut active_model = transactions::ActiveModel {
            id: Set(id),
            updated_at: Set(Some(Utc::now())),
            ..Default::default()
        };

        if let Some(patient_id) = changes.patient_id {
            active_model.patient_id = Set(patient_id);
        }
        if let Some(ref service_type) = changes.service_type {
            active_model.service_type = Set(service_type.clone());
        }
        if let Some(amount) = changes.amount {
            active_model.amount = Set(amount);
        }
        if let Some(transaction_date) = changes.transaction_date {
            active_model.transaction_date = Set(transaction_date);
        }
        if let Some(status) = changes.status {
            active_model.status = Set(status);
        }

        let updated = active_model.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotFound(_) => DatabaseError::NotFound,
            _ => DatabaseError::Database(e.to_string()),
        })?;

        Ok(updated)
    }

    /// Delete a transaction record
    pub async fn delete(&self, id: i32) -> DatabaseResult<()> {
        let result = transactions::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DatabaseError::NotFound);
        }

        Ok(())
    }

    /// Delete all transactions belonging to a patient
    pub async fn delete_by_patient(&self, patient_id: i32) -> DatabaseResult<u64> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::PatientId.eq(patient_id))
            .exec(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Count records matching a query (ignoring pagination)
    pub async fn count(&self, query: &TransactionQuery) -> DatabaseResult<u64> {
        let mut select = transactions::Entity::find();

        if let Some(patient_id) = query.patient_id {
            select = select.filter(transactions::Column::PatientId.eq(patient_id));
        }
        if let Some(status) = query.status {
            select = select.filter(transactions::Column::Status.eq(status));
        }
        if let Some(start_date) = query.start_date {
            select = select.filter(transactions::Column::TransactionDate.gte(start_date));
        }
        if let Some(end_date) = query.end_date {
            select = select.filter(transactions::Column::TransactionDate.lte(end_date));
        }

        let count = select
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(count)
    }
}
