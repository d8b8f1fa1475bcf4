use chrono::{Duration, Utc};
use http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;
use tracing::debug;

use shared_models::auth::JwtClaims;
use shared_models::error::AppError;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Missing authorization header")]
    Missing,

    #[error("Malformed token")]
    Malformed,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("JWT secret is not set")]
    SecretNotConfigured,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Missing => AppError::Unauthenticated("Unauthorized access".to_string()),
            TokenError::SecretNotConfigured | TokenError::Signing(_) => {
                AppError::Internal(err.to_string())
            }
            TokenError::Malformed | TokenError::Expired | TokenError::InvalidSignature => {
                AppError::Forbidden("Forbidden access".to_string())
            }
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    let auth_value = headers
        .get(AUTHORIZATION)
        .ok_or(TokenError::Missing)?
        .to_str()
        .map_err(|_| TokenError::Malformed)?;

    match auth_value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(TokenError::Malformed),
    }
}

pub fn issue_token(email: &str, jwt_secret: &str, expiry_hours: i64) -> Result<String, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::SecretNotConfigured);
    }

    let now = Utc::now();
    let claims = JwtClaims {
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(expiry_hours)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verifies signature and expiry. Expiry is the only invalidation mechanism.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<JwtClaims, TokenError> {
    if jwt_secret.is_empty() {
        return Err(TokenError::SecretNotConfigured);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        debug!("Token rejected: {}", e);
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    })?;

    debug!("Token validated successfully for: {}", data.claims.email);
    Ok(data.claims)
}
