use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use shared_models::entities::Invoice;
use shared_models::error::AppError;
use shared_utils::{AppState, ValidatedJson};

use crate::models::{CreateInvoiceRequest, InvoiceResponse};
use crate::services::InvoiceService;

#[axum::debug_handler]
pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), AppError> {
    let service = InvoiceService::new(&state);
    let invoice = service.create_invoice(request).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

#[axum::debug_handler]
pub async fn get_invoice(
    State(state): State<Arc<AppState>>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let service = InvoiceService::new(&state);
    Ok(Json(service.get_invoice(invoice_id).await?))
}

#[axum::debug_handler]
pub async fn mark_invoice_paid(
    State(state): State<Arc<AppState>>,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<Invoice>, AppError> {
    let service = InvoiceService::new(&state);
    Ok(Json(service.mark_paid(invoice_id).await?))
}

#[axum::debug_handler]
pub async fn download_invoice_document(
    State(state): State<Arc<AppState>>,
    Path(invoice_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let service = InvoiceService::new(&state);
    let document = service.get_document(invoice_id).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"invoice-{}.pdf\"", invoice_id),
        ),
    ];
    Ok((headers, document))
}
