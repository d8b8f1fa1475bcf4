use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, info, warn};

use shared_models::auth::{AdminStatus, TokenResponse};
use shared_models::clinic::{InsertAck, UpdateAck, UserRecord};
use shared_models::error::AppError;
use shared_utils::jwt::issue_token;
use shared_utils::roles::resolve_role;
use shared_utils::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub email: Option<String>,
}

/// Issues an access token for a registered email. Unknown emails get a 403
/// with an empty token.
pub async fn issue_access_token(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TokenQuery>,
) -> Result<Response, AppError> {
    let email = query.email.unwrap_or_default();
    debug!("Token requested for {}", email);

    if state.repository.user_by_email(&email).await?.is_none() {
        warn!("Token refused for unregistered email {}", email);
        let body = TokenResponse {
            access_token: String::new(),
        };
        return Ok((StatusCode::FORBIDDEN, Json(body)).into_response());
    }

    let token = issue_token(&email, &state.config.jwt_secret, state.config.jwt_expiry_hours)?;
    Ok(Json(TokenResponse { access_token: token }).into_response())
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserRecord>>, AppError> {
    let users = state.repository.users().await?;
    Ok(Json(users))
}

/// Non-admins get a 403 body rather than `false` with 200.
pub async fn get_admin_status(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Response, AppError> {
    let role = resolve_role(state.repository.as_ref(), &email).await?;

    let status = if role.is_admin() {
        StatusCode::OK
    } else {
        StatusCode::FORBIDDEN
    };
    Ok((status, Json(AdminStatus { is_admin: role.is_admin() })).into_response())
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(user): Json<UserRecord>,
) -> Result<Json<InsertAck>, AppError> {
    let stored = state.repository.insert_user(user).await?;
    info!("User registered: {}", stored.email.as_deref().unwrap_or("-"));
    Ok(Json(InsertAck::inserted(stored.id)))
}

pub async fn promote_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UpdateAck>, AppError> {
    let ack = state.repository.promote_to_admin(&user_id).await?;
    info!("User {} promoted to admin", user_id);
    Ok(Json(ack))
}
