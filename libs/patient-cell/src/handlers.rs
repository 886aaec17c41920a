use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared_models::entities::Patient;
use shared_models::error::AppError;
use shared_utils::{AppState, ValidatedJson};

use crate::models::{CreatePatientRequest, UpdatePatientRequest};
use crate::services::PatientService;

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Patient>), AppError> {
    let service = PatientService::new(&state);

    let patient = service.create_patient(request).await?;

    Ok((StatusCode::CREATED, Json(patient)))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Patient>>, AppError> {
    let service = PatientService::new(&state);

    Ok(Json(service.list_patients().await?))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Patient>, AppError> {
    let service = PatientService::new(&state);

    let patient = service.get_patient(patient_id).await?;

    Ok(Json(patient))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdatePatientRequest>,
) -> Result<Json<Patient>, AppError> {
    let service = PatientService::new(&state);

    let patient = service.update_patient(patient_id, request).await?;

    Ok(Json(patient))
}
