//! File routes: upload metadata, own-file listing, deletion.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::file::{CreateFile, StoredFile};
use crate::services::files as file_service;
use crate::AppState;

/// POST /files — record an uploaded file against the current user.
pub async fn upload(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateFile>,
) -> Result<Json<ApiResponse<StoredFile>>, AppError> {
    let file = file_service::record_upload(&state.store, current_user.id, &body).await?;
    Ok(ApiResponse::success(file))
}

/// GET /files — the current user's files.
pub async fn own_files(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<StoredFile>>>, AppError> {
    let user = state
        .store
        .find_by_id(current_user.id)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(ApiResponse::success(user.files))
}

/// DELETE /files/{id} — remove one of the current user's files.
pub async fn remove(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    file_service::delete_file(&state.store, current_user.id, id).await?;
    Ok(ApiResponse::success("File deleted"))
}
