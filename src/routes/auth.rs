//! Authentication routes: registration, login, token verification.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::user::{RegisterUser, UserRole};
use crate::services::auth as auth_service;
use crate::services::auth::AuthSession;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Decoded claims returned by the verify endpoint.
#[derive(Debug, Serialize)]
pub struct VerifiedToken {
    pub subject: uuid::Uuid,
    pub role: UserRole,
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterUser>,
) -> Result<Json<ApiResponse<AuthSession>>, AppError> {
    let session = auth_service::register(
        &state.store,
        &body,
        state.config.default_storage_bytes,
        &state.config.jwt_secret,
        state.config.jwt_token_expiry_secs,
    )
    .await?;

    Ok(ApiResponse::success(session))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthSession>>, AppError> {
    let session = auth_service::login(
        &state.store,
        &body.email,
        &body.password,
        &state.config.jwt_secret,
        state.config.jwt_token_expiry_secs,
    )
    .await?;

    Ok(ApiResponse::success(session))
}

/// GET /auth/verify — validate the bearer token and echo its role claim.
pub async fn verify(current_user: CurrentUser) -> Json<ApiResponse<VerifiedToken>> {
    ApiResponse::success(VerifiedToken {
        subject: current_user.id,
        role: current_user.role,
    })
}
