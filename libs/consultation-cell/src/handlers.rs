use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared_models::entities::Consultation;
use shared_models::error::AppError;
use shared_utils::{AppState, ValidatedJson};

use crate::models::CreateConsultationRequest;
use crate::services::ConsultationService;

#[axum::debug_handler]
pub async fn create_consultation(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateConsultationRequest>,
) -> Result<Json<Consultation>, AppError> {
    let service = ConsultationService::new(&state);
    Ok(Json(service.create_consultation(request).await?))
}

#[axum::debug_handler]
pub async fn get_appointment_consultation(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Consultation>, AppError> {
    let service = ConsultationService::new(&state);
    Ok(Json(service.get_for_appointment(appointment_id).await?))
}
