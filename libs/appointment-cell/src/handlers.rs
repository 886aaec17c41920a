// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared_models::entities::Appointment;
use shared_models::error::AppError;
use shared_utils::{AppState, ValidatedJson};

use crate::models::{BookAppointmentRequest, UpdateStatusRequest};
use crate::services::AppointmentBookingService;

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let booking_service = AppointmentBookingService::new(&state);
    let appointment = booking_service.book_appointment(request).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);
    Ok(Json(booking_service.get_appointment(appointment_id).await?))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<Appointment>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);
    let appointment = booking_service
        .update_status(appointment_id, request.status)
        .await?;
    Ok(Json(appointment))
}

#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);
    Ok(Json(booking_service.get_doctor_appointments(doctor_id).await?))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let booking_service = AppointmentBookingService::new(&state);
    Ok(Json(booking_service.get_patient_appointments(patient_id).await?))
}
