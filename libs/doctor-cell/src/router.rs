use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get},
    middleware,
};

use shared_utils::extractor::{require_admin, require_authenticated};
use shared_utils::AppState;

use crate::handlers;

/// Roster management is admin-only.
pub fn doctor_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/doctors", get(handlers::list_doctors).post(handlers::add_doctor))
        .route("/doctors/{doctor_id}", delete(handlers::remove_doctor))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_authenticated))
        .with_state(state)
}
