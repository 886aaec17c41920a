use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_utils::AppState;

use crate::handlers;

pub fn prescription_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::create_prescription))
        .route("/{prescription_id}", get(handlers::get_prescription))
        .with_state(state)
}
