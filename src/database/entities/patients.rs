use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "patients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub date_of_birth: NaiveDate,
    #[sea_orm(unique)]
    pub medical_record_number: String,
    pub contact: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Create a new patient record; generates an MRN when none is supplied
    pub fn new(
        name: impl Into<String>,
        date_of_birth: NaiveDate,
        medical_record_number: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be auto-assigned by database
            name: name.into(),
            date_of_birth,
            medical_record_number: medical_record_number.unwrap_or_else(generate_mrn),
            contact: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder method to set contact info
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// Builder method to set ID (for tests)
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}

/// Generate a medical record number: `MRN-<unix-timestamp>-<8 hex chars>`
pub fn generate_mrn() -> String {
    let suffix: u32 = rand::rng().random();
    format!("MRN-{}-{:08x}", Utc::now().timestamp(), suffix)
}
