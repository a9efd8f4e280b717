use super::{Patients, Transactions};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Transactions::PatientId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::ServiceType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Amount)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::TransactionDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create foreign key constraint only for PostgreSQL (SQLite doesn't support adding FK
        // after table creation); on SQLite the patients DAO deletes dependents explicitly
        if manager.get_database_backend() == sea_orm::DatabaseBackend::Postgres {
            manager
                .create_foreign_key(
                    ForeignKey::create()
                        .name("fk_transactions_patient_id")
                        .from(Transactions::Table, Transactions::PatientId)
                        .to(Patients::Table, Patients::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .to_owned(),
                )
                .await?;
        }

        // Create index on patient_id for per-patient queries
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_patient_id")
                    .table(Transactions::Table)
                    .col(Transactions::PatientId)
                    .to_owned(),
            )
            .await?;

        // Create index on transaction_date for time-based queries
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_date")
                    .table(Transactions::Table)
                    .col(Transactions::TransactionDate)
                    .to_owned(),
            )
            .await?;

        // Create composite index for patient + time queries
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transactions_patient_date")
                    .table(Transactions::Table)
                    .col(Transactions::PatientId)
                    .col(Transactions::TransactionDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await
    }
}
