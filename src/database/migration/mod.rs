use sea_orm_migration::prelude::*;

pub use sea_orm_migration::MigratorTrait;

mod m20250115_100000_create_patients_table;
mod m20250115_100100_create_transactions_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250115_100000_create_patients_table::Migration),
            Box::new(m20250115_100100_create_transactions_table::Migration),
        ]
    }
}

/// Common table and column identifiers
#[derive(Iden)]
pub enum Patients {
    Table,
    Id,
    Name,
    DateOfBirth,
    MedicalRecordNumber,
    Contact,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Transactions {
    Table,
    Id,
    PatientId,
    ServiceType,
    Amount,
    TransactionDate,
    Status,
    CreatedAt,
    UpdatedAt,
}
