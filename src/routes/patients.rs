use crate::{
    database::{PatientUpdate, entities::PatientRecord},
    error::AppError,
    server::Server,
};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

/// Create patient API routes
pub fn create_patient_routes() -> Router<Server> {
    Router::new()
        .route("/patients", post(create_patient))
        .route("/patients", get(list_patients))
        .route("/patients/{id}", get(get_patient))
        .route("/patients/{id}", put(update_patient))
        .route("/patients/{id}", delete(delete_patient))
}

/// Request to register a new patient
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePatientRequest {
    pub name: String,
    pub date_of_birth: NaiveDate,
    /// Auto-generated when absent
    pub medical_record_number: Option<String>,
    pub contact: Option<String>,
}

/// Request to update patient demographics
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub contact: Option<String>,
}

async fn create_patient(
    State(server): State<Server>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<PatientRecord>), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("name must not be empty".to_string()));
    }

    if let Some(ref mrn) = request.medical_record_number {
        if server.database.patients().find_by_mrn(mrn).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "medical record number already in use: {}",
                mrn
            )));
        }
    }

    let mut patient = PatientRecord::new(
        request.name.trim(),
        request.date_of_birth,
        request.medical_record_number,
    );
    if let Some(contact) = request.contact {
        patient = patient.with_contact(contact);
    }

    let created = server.database.patients().insert(&patient).await?;
    info!(
        patient_id = created.id,
        mrn = %created.medical_record_number,
        "Registered patient"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_patients(
    State(server): State<Server>,
) -> Result<Json<Vec<PatientRecord>>, AppError> {
    let patients = server.database.patients().list().await?;
    Ok(Json(patients))
}

async fn get_patient(
    State(server): State<Server>,
    Path(id): Path<i32>,
) -> Result<Json<PatientRecord>, AppError> {
    let patient = server
        .database
        .patients()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Patient not found: {}", id)))?;

    Ok(Json(patient))
}

async fn update_patient(
    State(server): State<Server>,
    Path(id): Path<i32>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<PatientRecord>, AppError> {
    if let Some(ref name) = request.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".to_string()));
        }
    }

    let changes = PatientUpdate {
        name: request.name.map(|n| n.trim().to_string()),
        date_of_birth: request.date_of_birth,
        contact: request.contact,
    };

    let updated = server
        .database
        .patients()
        .update_demographics(id, &changes)
        .await?;

    Ok(Json(updated))
}

async fn delete_patient(
    State(server): State<Server>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    server.database.patients().delete(id).await?;
    info!(patient_id = id, "Deleted patient and cascaded transactions");

    Ok(StatusCode::NO_CONTENT)
}
