use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::require_authenticated;
use shared_utils::AppState;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/appointmentOptions", get(handlers::get_appointment_options))
        .route("/v2/appointmentOptions", get(handlers::get_appointment_options_aggregated))
        .route("/appointmentSpecialty", get(handlers::get_appointment_specialties))
        .route("/bookings", post(handlers::create_booking))
        .route("/bookings/{booking_id}", get(handlers::get_booking));

    // Patients may only list their own bookings
    let protected_routes = Router::new()
        .route("/bookings", get(handlers::get_patient_bookings))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_authenticated));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
