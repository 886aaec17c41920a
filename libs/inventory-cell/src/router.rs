// libs/inventory-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use shared_utils::AppState;

use crate::handlers;

pub fn inventory_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_medicines).post(handlers::create_medicine))
        .route("/low-stock", get(handlers::low_stock_medicines))
        .route(
            "/{medicine_id}",
            get(handlers::get_medicine)
                .put(handlers::update_medicine)
                .delete(handlers::delete_medicine),
        )
        .with_state(state)
}
