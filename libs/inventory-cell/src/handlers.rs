use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use shared_models::entities::Medicine;
use shared_models::error::AppError;
use shared_utils::{AppState, ValidatedJson};

use crate::models::{CreateMedicineRequest, UpdateMedicineRequest};
use crate::services::InventoryService;

#[axum::debug_handler]
pub async fn list_medicines(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Medicine>>, AppError> {
    let service = InventoryService::new(&state);
    Ok(Json(service.list_medicines().await?))
}

#[axum::debug_handler]
pub async fn create_medicine(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateMedicineRequest>,
) -> Result<(StatusCode, Json<Medicine>), AppError> {
    let service = InventoryService::new(&state);
    let medicine = service.create_medicine(request).await?;
    Ok((StatusCode::CREATED, Json(medicine)))
}

#[axum::debug_handler]
pub async fn get_medicine(
    State(state): State<Arc<AppState>>,
    Path(medicine_id): Path<Uuid>,
) -> Result<Json<Medicine>, AppError> {
    let service = InventoryService::new(&state);
    Ok(Json(service.get_medicine(medicine_id).await?))
}

#[axum::debug_handler]
pub async fn update_medicine(
    State(state): State<Arc<AppState>>,
    Path(medicine_id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateMedicineRequest>,
) -> Result<Json<Medicine>, AppError> {
    let service = InventoryService::new(&state);
    Ok(Json(service.update_medicine(medicine_id, request).await?))
}

#[axum::debug_handler]
pub async fn delete_medicine(
    State(state): State<Arc<AppState>>,
    Path(medicine_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let service = InventoryService::new(&state);
    service.delete_medicine(medicine_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn low_stock_medicines(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Medicine>>, AppError> {
    let service = InventoryService::new(&state);
    Ok(Json(service.low_stock().await?))
}
