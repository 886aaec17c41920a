use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_utils::{AppState, ValidatedJson};

use crate::models::{CreatePrescriptionRequest, PrescriptionResponse};
use crate::services::PrescriptionService;

#[axum::debug_handler]
pub async fn create_prescription(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreatePrescriptionRequest>,
) -> Result<Json<PrescriptionResponse>, AppError> {
    let service = PrescriptionService::new(&state);
    Ok(Json(service.create_prescription(request).await?))
}

#[axum::debug_handler]
pub async fn get_prescription(
    State(state): State<Arc<AppState>>,
    Path(prescription_id): Path<Uuid>,
) -> Result<Json<PrescriptionResponse>, AppError> {
    let service = PrescriptionService::new(&state);
    Ok(Json(service.get_prescription(prescription_id).await?))
}
