use crate::{
    config::Config,
    database::DatabaseManager,
    database::entities::{PatientRecord, TransactionRecord, TransactionStatus},
    server::Server,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Test server builder for creating test instances backed by in-memory SQLite
pub struct TestServerBuilder {
    config: Config,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        let mut config = Config::default();
        config.database.url = "sqlite::memory:".to_string();
        config.logging.log_request = false;
        Self { config }
    }

    /// Set a custom configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build the test server with migrations applied
    pub async fn build(self) -> Server {
        let server = Server::new(self.config).await.unwrap();
        server.database.migrate().await.unwrap();
        server
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a test patient in the database, returning its ID
pub async fn create_test_patient(database: &Arc<dyn DatabaseManager>) -> i32 {
    let patient = PatientRecord::new(
        "Test Patient",
        NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
        None,
    )
    .with_contact("test@example.com");

    database.patients().insert(&patient).await.unwrap().id
}

/// Create a test patient with custom data, returning its ID
pub async fn create_test_patient_with_data(
    database: &Arc<dyn DatabaseManager>,
    name: &str,
    mrn: &str,
) -> i32 {
    let patient = PatientRecord::new(
        name,
        NaiveDate::from_ymd_opt(1985, 2, 1).unwrap(),
        Some(mrn.to_string()),
    );

    database.patients().insert(&patient).await.unwrap().id
}

/// Create a test transaction for the given patient
pub async fn create_test_transaction(
    database: &Arc<dyn DatabaseManager>,
    patient_id: i32,
    cents: i64,
    transaction_date: DateTime<Utc>,
    status: TransactionStatus,
) -> TransactionRecord {
    let record = TransactionRecord::new(
        patient_id,
        "Consultation",
        Decimal::new(cents, 2),
        transaction_date,
        status,
    );

    database.transactions().insert(&record).await.unwrap()
}
