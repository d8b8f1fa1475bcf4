use axum::{
    extract::State,
    Json,
};
use tracing::info;

use shared_models::clinic::{InsertAck, Payment};
use shared_models::error::AppError;

use crate::models::{PaymentIntentRequest, PaymentIntentResponse};
use crate::router::PaymentState;
use crate::services::gateway::to_minor_units;

pub async fn create_payment_intent(
    State(state): State<PaymentState>,
    Json(request): Json<PaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, AppError> {
    let amount = to_minor_units(request.price)?;
    let currency = &state.app.config.payment_currency;

    let client_secret = state.gateway.create_payment_intent(amount, currency).await?;

    Ok(Json(PaymentIntentResponse { client_secret }))
}

/// Stored as sent; one booking may end up with several payment records.
pub async fn record_payment(
    State(state): State<PaymentState>,
    Json(payment): Json<Payment>,
) -> Result<Json<InsertAck>, AppError> {
    let stored = state.app.repository.insert_payment(payment).await?;
    info!(
        "Recorded payment {} for booking {}",
        stored.transaction_id, stored.booking_id
    );
    Ok(Json(InsertAck::inserted(stored.id)))
}
