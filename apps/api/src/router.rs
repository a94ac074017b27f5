use std::sync::Arc;

use axum::{routing::get, Router};

use auth_cell::router::auth_routes;
use booking_cell::router::booking_routes;
use shared_utils::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Barbearia API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/appointments", booking_routes(state.clone()))
}
