use async_trait::async_trait;

use crate::error::PaymentError;

/// External processor creating payment intents.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// `amount_minor` is in the currency's smallest unit. Returns the
    /// client secret the browser confirms the payment with.
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<String, PaymentError>;
}

/// Converts a major-unit price to minor units, rejecting prices that cannot
/// be charged.
pub fn to_minor_units(price: f64) -> Result<i64, PaymentError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(PaymentError::InvalidAmount(price));
    }
    Ok((price * 100.0).round() as i64)
}
