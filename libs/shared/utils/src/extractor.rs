use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::jwt::{bearer_token, validate_token};
use crate::roles::resolve_role;
use crate::state::AppState;

/// Verifies the bearer token and attaches the caller's [`AuthUser`].
/// No token is 401; a malformed, forged or expired one is 403.
pub async fn require_authenticated(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = {
        let token = bearer_token(request.headers())?;
        validate_token(token, &state.config.jwt_secret)?
    };

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Must run after [`require_authenticated`]; rejects non-admin callers with 403.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let email = extract_user(&request)?.email;

    let role = resolve_role(state.repository.as_ref(), &email).await?;
    if !role.is_admin() {
        warn!("Admin access denied for {}", email);
        return Err(AppError::Forbidden("Forbidden access".to_string()));
    }

    Ok(next.run(request).await)
}

pub fn extract_user<B>(request: &Request<B>) -> Result<AuthUser, AppError> {
    request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| AppError::Unauthenticated("Unauthorized access".to_string()))
}

/// A valid token only grants access to the caller's own records.
pub fn ensure_self_scope(user: &AuthUser, email: &str) -> Result<(), AppError> {
    if user.email != email {
        warn!("{} attempted to read records of {}", user.email, email);
        return Err(AppError::Forbidden("Forbidden access".to_string()));
    }
    Ok(())
}
