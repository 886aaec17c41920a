use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared_models::entities::Doctor;
use shared_models::error::AppError;
use shared_utils::{AppState, ValidatedJson};

use crate::models::{CreateDoctorRequest, UpdateDoctorRequest};
use crate::services::DoctorService;

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateDoctorRequest>,
) -> Result<(StatusCode, Json<Doctor>), AppError> {
    let doctor_service = DoctorService::new(&state);
    let doctor = doctor_service.create_doctor(request).await?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Doctor>>, AppError> {
    let doctor_service = DoctorService::new(&state);
    Ok(Json(doctor_service.list_doctors().await?))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Doctor>, AppError> {
    let doctor_service = DoctorService::new(&state);
    Ok(Json(doctor_service.get_doctor(doctor_id).await?))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateDoctorRequest>,
) -> Result<Json<Doctor>, AppError> {
    let doctor_service = DoctorService::new(&state);
    Ok(Json(doctor_service.update_doctor(doctor_id, request).await?))
}
