use std::sync::Arc;

use axum::{
    Router,
    routing::post,
};

use shared_utils::AppState;

use crate::handlers;
use crate::services::gateway::PaymentGateway;

#[derive(Clone)]
pub struct PaymentState {
    pub app: Arc<AppState>,
    pub gateway: Arc<dyn PaymentGateway>,
}

pub fn payment_routes(state: Arc<AppState>, gateway: Arc<dyn PaymentGateway>) -> Router {
    Router::new()
        .route("/create-payment-intent", post(handlers::create_payment_intent))
        .route("/payments", post(handlers::record_payment))
        .with_state(PaymentState { app: state, gateway })
}
