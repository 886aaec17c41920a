use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_utils::AppState;

use crate::handlers;

pub fn consultation_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::create_consultation))
        .route(
            "/appointment/{appointment_id}",
            get(handlers::get_appointment_consultation),
        )
        .with_state(state)
}
