use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use doctor_cell::router::doctor_routes;
use payment_cell::{payment_routes, PaymentGateway};
use shared_utils::AppState;

pub fn create_router(state: Arc<AppState>, gateway: Arc<dyn PaymentGateway>) -> Router {
    Router::new()
        .route("/", get(|| async { "Doctors portal server is running" }))
        .merge(appointment_routes(state.clone()))
        .merge(auth_routes(state.clone()))
        .merge(doctor_routes(state.clone()))
        .merge(payment_routes(state, gateway))
}
