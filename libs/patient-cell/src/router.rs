use std::sync::Arc;
use axum::{routing::get, Router};
use shared_utils::AppState;

use crate::handlers::*;

pub fn create_patient_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_patients).post(create_patient))
        .route("/{id}", get(get_patient).put(update_patient))
        .with_state(state)
}
