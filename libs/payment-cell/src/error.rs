use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment processor is not configured")]
    NotConfigured,

    #[error("Invalid payment amount: {0}")]
    InvalidAmount(f64),

    #[error("Payment processor request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Payment processor error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::InvalidAmount(_) => AppError::BadRequest(err.to_string()),
            _ => AppError::ExternalService(err.to_string()),
        }
    }
}
