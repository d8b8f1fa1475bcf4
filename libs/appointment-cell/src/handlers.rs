use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use tracing::debug;

use shared_models::auth::AuthUser;
use shared_models::clinic::{Booking, InsertAck, TreatmentAvailability, TreatmentName};
use shared_models::error::AppError;
use shared_utils::extractor::ensure_self_scope;
use shared_utils::AppState;

use crate::models::{AppointmentOptionsQuery, PatientBookingsQuery};
use crate::services::{
    availability::{AvailabilityService, AvailabilityStrategy},
    booking::{BookingError, BookingService},
};

async fn appointment_options(
    state: &AppState,
    query: AppointmentOptionsQuery,
    strategy: AvailabilityStrategy,
) -> Result<Json<Vec<TreatmentAvailability>>, AppError> {
    let date = query.date.unwrap_or_default();
    let service = AvailabilityService::new(state.repository.clone());

    let options = service.available_slots(&date, strategy).await?;
    Ok(Json(options))
}

pub async fn get_appointment_options(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AppointmentOptionsQuery>,
) -> Result<Json<Vec<TreatmentAvailability>>, AppError> {
    appointment_options(&state, query, AvailabilityStrategy::InMemory).await
}

pub async fn get_appointment_options_aggregated(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AppointmentOptionsQuery>,
) -> Result<Json<Vec<TreatmentAvailability>>, AppError> {
    appointment_options(&state, query, AvailabilityStrategy::Aggregated).await
}

pub async fn get_appointment_specialties(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TreatmentName>>, AppError> {
    let names = state.repository.treatment_names().await?;
    Ok(Json(names))
}

pub async fn get_patient_bookings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PatientBookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let email = query.email.unwrap_or_default();
    ensure_self_scope(&user, &email)?;

    debug!("Listing bookings for {}", email);
    let bookings = BookingService::new(state.repository.clone())
        .bookings_for(&email)
        .await?;
    Ok(Json(bookings))
}

/// Unknown ids answer `null`.
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<Json<Option<Booking>>, AppError> {
    let booking = BookingService::new(state.repository.clone())
        .booking(&booking_id)
        .await?;
    Ok(Json(booking))
}

/// A duplicate booking is answered with `acknowledged: false` and a 200,
/// which is what the booking form expects.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(booking): Json<Booking>,
) -> Result<Json<InsertAck>, AppError> {
    let service = BookingService::new(state.repository.clone());

    match service.try_create_booking(booking).await {
        Ok(stored) => Ok(Json(InsertAck::inserted(stored.id))),
        Err(err @ BookingError::Conflict { .. }) => Ok(Json(InsertAck::rejected(err.to_string()))),
        Err(err) => Err(err.into()),
    }
}
