//! Route definitions.

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::handlers::{callbacks, health};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/callbacks/v2", post(callbacks::receive_v2))
        .route(
            "/callbacks/v1",
            get(callbacks::receive_v1_query).post(callbacks::receive_v1_form),
        )
        .with_state(state)
}
