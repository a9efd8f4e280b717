use crate::database::entities::{PatientRecord, patients, transactions};
use crate::database::{DatabaseError, DatabaseResult};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

/// Demographic fields that may change after creation
#[derive(Debug, Default, Clone)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub contact: Option<String>,
}

/// Patients DAO for database operations
#[derive(Clone)]
pub struct PatientsDao {
    db: DatabaseConnection,
}

impl PatientsDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Store a patient record, returning the persisted row
    pub async fn insert(&self, patient: &PatientRecord) -> DatabaseResult<PatientRecord> {
        let active_model = patients::ActiveModel {
            id: ActiveValue::NotSet, // Let database auto-assign ID
            name: Set(patient.name.clone()),
            date_of_birth: Set(patient.date_of_birth),
            medical_record_number: Set(patient.medical_record_number.clone()),
            contact: Set(patient.contact.clone()),
            created_at: Set(patient.created_at),
            updated_at: Set(patient.updated_at),
        };

        active_model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => DatabaseError::Constraint(format!(
                "duplicate medical record number: {}",
                patient.medical_record_number
            )),
            _ => DatabaseError::Database(e.to_string()),
        })
    }

    /// Find patient by ID
    pub async fn find_by_id(&self, patient_id: i32) -> DatabaseResult<Option<PatientRecord>> {
        let patient = patients::Entity::find_by_id(patient_id)
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(patient)
    }

    /// Find patient by medical record number
    pub async fn find_by_mrn(&self, mrn: &str) -> DatabaseResult<Option<PatientRecord>> {
        let patient = patients::Entity::find()
            .filter(patients::Column::MedicalRecordNumber.eq(mrn))
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(patient)
    }

    /// List all patients, newest first
    pub async fn list(&self) -> DatabaseResult<Vec<PatientRecord>> {
        let patients = patients::Entity::find()
            .order_by_desc(patients::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(patients)
    }

    /// Update demographic fields, stamping `updated_at`
    pub async fn update_demographics(
        &self,
        patient_id: i32,
        changes: &PatientUpdate,
    ) -> DatabaseResult<PatientRecord> {
        let mut active_model = patients::ActiveModel {
            id: Set(patient_id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };

        if let Some(ref name) = changes.name {
            active_model.name = Set(name.clone());
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            active_model.date_of_birth = Set(date_of_birth);
        }
        if let Some(ref contact) = changes.contact {
            active_model.contact = Set(Some(contact.clone()));
        }

        let updated = active_model.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotFound(_) => DatabaseError::NotFound,
            _ => DatabaseError::Database(e.to_string()),
        })?;

        Ok(updated)
    }

    /// Delete a patient and all of its transactions
    ///
    /// The cascade is an explicit two-step delete inside one database
    /// transaction so SQLite behaves the same as PostgreSQL with its FK.
    pub async fn delete(&self, patient_id: i32) -> DatabaseResult<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        transactions::Entity::delete_many()
            .filter(transactions::Column::PatientId.eq(patient_id))
            .exec(&txn)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        let result = patients::Entity::delete_by_id(patient_id)
            .exec(&txn)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DatabaseError::NotFound);
        }

        txn.commit()
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(())
    }

    /// Check whether a patient exists
    pub async fn exists(&self, patient_id: i32) -> DatabaseResult<bool> {
        Ok(self.find_by_id(patient_id).await?.is_some())
    }

    /// Count all patients
    pub async fn count(&self) -> DatabaseResult<u64> {
        let count = patients::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(count)
    }
}
