use crate::{
    database::{
        TransactionQuery, TransactionUpdate,
        entities::{TransactionRecord, TransactionStatus},
    },
    error::AppError,
    server::Server,
};
use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

/// Create transaction API routes
pub fn create_transaction_routes() -> Router<Server> {
    Router::new()
        .route("/transactions", post(create_transaction))
        .route("/transactions", get(list_transactions))
        .route("/transactions/{id}", get(get_transaction))
        .route("/transactions/{id}", put(update_transaction))
        .route("/transactions/{id}", delete(delete_transaction))
}

/// Request to record a billable transaction
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    pub patient_id: i32,
    pub service_type: String,
    pub amount: Decimal,
    pub transaction_date: DateTime<Utc>,
    pub status: TransactionStatus,
}

/// Request to update a transaction; absent fields are left unchanged
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTransactionRequest {
    pub patient_id: Option<i32>,
    pub service_type: Option<String>,
    pub amount: Option<Decimal>,
    pub transaction_date: Option<DateTime<Utc>>,
    pub status: Option<TransactionStatus>,
}

/// Query parameters for transaction listing
#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    pub patient_id: Option<i32>,
    pub status: Option<TransactionStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Response for the transaction listing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct TransactionsResponse {
    pub records: Vec<TransactionRecord>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

fn validate_amount(amount: Decimal) -> Result<(), AppError> {
    if amount < Decimal::ZERO {
        return Err(AppError::BadRequest(
            "amount must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_service_type(service_type: &str) -> Result<(), AppError> {
    if service_type.trim().is_empty() {
        return Err(AppError::BadRequest(
            "service type must not be empty".to_string(),
        ));
    }
    Ok(())
}

async fn ensure_patient_exists(server: &Server, patient_id: i32) -> Result<(), AppError> {
    if !server.database.patients().exists(patient_id).await? {
        return Err(AppError::NotFound(format!(
            "Patient not found: {}",
            patient_id
        )));
    }
    Ok(())
}

async fn create_transaction(
    State(server): State<Server>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionRecord>), AppError> {
    validate_amount(request.amount)?;
    validate_service_type(&request.service_type)?;
    // Patient reference is validated at creation time only
    ensure_patient_exists(&server, request.patient_id).await?;

    let record = TransactionRecord::new(
        request.patient_id,
        request.service_type.trim(),
        request.amount,
        request.transaction_date,
        request.status,
    );

    let created = server.database.transactions().insert(&record).await?;
    info!(
        transaction_id = created.id,
        patient_id = created.patient_id,
        amount = %created.amount,
        "Recorded transaction"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_transactions(
    State(server): State<Server>,
    Query(params): Query<TransactionListQuery>,
) -> Result<Json<TransactionsResponse>, AppError> {
    let limit = params.limit.unwrap_or(50).min(500); // Max 500 records
    let offset = params.offset.unwrap_or(0);

    let query = TransactionQuery {
        patient_id: params.patient_id,
        status: params.status,
        start_date: params.start_date,
        end_date: params.end_date,
        limit: Some(limit),
        offset: Some(offset),
    };

    let records = server.database.transactions().get_records(&query).await?;
    let total = server.database.transactions().count(&query).await?;

    Ok(Json(TransactionsResponse {
        records,
        total,
        limit,
        offset,
    }))
}

async fn get_transaction(
    State(server): State<Server>,
    Path(id): Path<i32>,
) -> Result<Json<TransactionRecord>, AppError> {
    let record = server
        .database
        .transactions()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction not found: {}", id)))?;

    Ok(Json(record))
}

async fn update_transaction(
    State(server): State<Server>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<TransactionRecord>, AppError> {
    let existing = server
        .database
        .transactions()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction not found: {}", id)))?;

    if let Some(amount) = request.amount {
        validate_amount(amount)?;
    }
    if let Some(ref service_type) = request.service_type {
        validate_service_type(service_type)?;
    }
    // Re-validate the patient reference only when it changes
    if let Some(patient_id) = request.patient_id {
        if patient_id != existing.patient_id {
            ensure_patient_exists(&server, patient_id).await?;
        }
    }

    let changes = TransactionUpdate {
        patient_id: request.patient_id,
        service_type: request.service_type.map(|s| s.trim().to_string()),
        amount: request.amount,
        transaction_date: request.transaction_date,
        status: request.status,
    };

    let updated = server.database.transactions().update(id, &changes).await?;

    Ok(Json(updated))
}

async fn delete_transaction(
    State(server): State<Server>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    server.database.transactions().delete(id).await?;
    info!(transaction_id = id, "Deleted transaction");

    Ok(StatusCode::NO_CONTENT)
}
