use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_utils::AppState;

use crate::handlers;

pub fn invoice_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::create_invoice))
        .route("/{invoice_id}", get(handlers::get_invoice))
        .route("/{invoice_id}/pay", post(handlers::mark_invoice_paid))
        .route("/{invoice_id}/document", get(handlers::download_invoice_document))
        .with_state(state)
}
