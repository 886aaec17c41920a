use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::appointment_routes;
use consultation_cell::consultation_routes;
use doctor_cell::doctor_routes;
use inventory_cell::inventory_routes;
use invoice_cell::invoice_routes;
use patient_cell::create_patient_router;
use prescription_cell::prescription_routes;
use shared_utils::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic API is running!" }))
        .nest("/patients", create_patient_router(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/consultations", consultation_routes(state.clone()))
        .nest("/medicines", inventory_routes(state.clone()))
        .nest("/prescriptions", prescription_routes(state.clone()))
        .nest("/invoices", invoice_routes(state))
}
