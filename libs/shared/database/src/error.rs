use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Store request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Store API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid store configuration: {0}")]
    Configuration(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Database(err.to_string())
    }
}
