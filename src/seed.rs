//! Deterministic demo data for dashboard development

use crate::database::entities::{PatientRecord, TransactionRecord, TransactionStatus};
use crate::database::{DatabaseManager, DatabaseResult};
use chrono::{Duration, NaiveDate, Utc};
use rand::prelude::*;
use rust_decimal::Decimal;
use tracing::info;

const SERVICE_TYPES: &[&str] = &[
    "Consultation",
    "Lab Work",
    "X-Ray",
    "Physical Therapy",
    "Vaccination",
    "Dental Cleaning",
];

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bob", "Charlie", "Diana", "Eve", "Frank", "Grace", "Henry", "Ivy", "Jack", "Kate",
    "Liam", "Maya", "Noah", "Olivia", "Paul",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Brown", "Clark", "Davis", "Evans", "Garcia", "Hughes", "Iverson", "Johnson",
    "Kim", "Lopez", "Murphy",
];

/// Seed run parameters
#[derive(Debug, Clone)]
pub struct SeedOptions {
    pub patients: usize,
    pub transactions: usize,
    pub days_back: i64,
    pub seed: Option<u64>,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            patients: 10,
            transactions: 200,
            days_back: 365,
            seed: None,
        }
    }
}

/// What a seed run inserted
#[derive(Debug, Clone)]
pub struct SeedReport {
    pub patients: usize,
    pub transactions: usize,
}

/// Populate the store with reproducible demo patients and transactions
pub async fn run(
    database: &dyn DatabaseManager,
    options: &SeedOptions,
) -> DatabaseResult<SeedReport> {
    let mut rng = StdRng::seed_from_u64(options.seed.unwrap_or(42));
    let now = Utc::now();

    info!(
        patients = options.patients,
        transactions = options.transactions,
        days_back = options.days_back,
        "Seeding demo data"
    );

    let mut patient_ids = Vec::with_capacity(options.patients);
    for _ in 0..options.patients {
        let first = FIRST_NAMES.choose(&mut rng).unwrap_or(&"Alex");
        let last = LAST_NAMES.choose(&mut rng).unwrap_or(&"Doe");
        let dob = NaiveDate::from_ymd_opt(
            rng.random_range(1940..2010),
            rng.random_range(1..=12),
            rng.random_range(1..=28),
        )
        .unwrap_or_else(|| now.date_naive());

        let patient = PatientRecord::new(format!("{} {}", first, last), dob, None)
            .with_contact(format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()));

        let created = database.patients().insert(&patient).await?;
        patient_ids.push(created.id);
    }

    let minutes_back = options.days_back.max(1) * 24 * 60;
    let mut inserted = 0;
    for _ in 0..options.transactions {
        let Some(&patient_id) = patient_ids.choose(&mut rng) else {
            break;
        };

        let service_type = SERVICE_TYPES.choose(&mut rng).unwrap_or(&"Consultation");
        let amount = Decimal::new(rng.random_range(2_000..50_000), 2);
        let transaction_date = now - Duration::minutes(rng.random_range(0..minutes_back));
        let status = if rng.random_bool(0.7) {
            TransactionStatus::Paid
        } else {
            TransactionStatus::Unpaid
        };

        let record = TransactionRecord::new(
            patient_id,
            *service_type,
            amount,
            transaction_date,
            status,
        );
        database.transactions().insert(&record).await?;
        inserted += 1;
    }

    info!(
        patients = patient_ids.len(),
        transactions = inserted,
        "Seed complete"
    );

    Ok(SeedReport {
        patients: patient_ids.len(),
        transactions: inserted,
    })
}
