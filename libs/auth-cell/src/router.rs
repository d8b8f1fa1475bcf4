use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
    middleware,
};

use shared_utils::extractor::{require_admin, require_authenticated};
use shared_utils::AppState;

use crate::handlers;

pub fn auth_routes(state: Arc<AppState>) -> Router {
    // `/users/admin/{id}` is read as an email by the status check and as a
    // record id by the promotion.
    let public_routes = Router::new()
        .route("/jwt", get(handlers::issue_access_token))
        .route("/users", post(handlers::create_user))
        .route("/users/admin/{id}", get(handlers::get_admin_status));

    // Admin gate runs inside the authentication layer
    let admin_routes = Router::new()
        .route("/users", get(handlers::list_users))
        .route("/users/admin/{id}", put(handlers::promote_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_authenticated));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
}
