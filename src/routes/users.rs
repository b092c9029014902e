//! User routes: fleet listing (admin) and per-user records.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::models::user::{UserResponse, UserRole};
use crate::services::usage::{self, StorageUsage};
use crate::AppState;

/// GET /users — admin-only listing of every user with their files.
pub async fn all_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let users = state
        .store
        .all()
        .await
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(ApiResponse::success(users))
}

/// GET /users/{id} — self-or-admin single record.
pub async fn user_by_id(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    if current_user.id != id && current_user.role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "Cannot read another user's record".to_string(),
        ));
    }
    let user = state
        .store
        .find_by_id(id)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// GET /users/{id}/usage — derived storage usage for one user.
pub async fn user_usage(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StorageUsage>>, AppError> {
    if current_user.id != id && current_user.role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "Cannot read another user's usage".to_string(),
        ));
    }
    let user = state
        .store
        .find_by_id(id)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(ApiResponse::success(usage::compute_usage(&user)))
}
