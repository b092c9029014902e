//! File record service: quota-checked uploads and deletion.

use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::file::{CreateFile, StoredFile};
use crate::models::user::User;
use crate::services::usage;
use crate::store::UserStore;

/// Record an uploaded file against its owner, enforcing the storage quota.
pub async fn record_upload(
    store: &UserStore,
    owner_id: Uuid,
    input: &CreateFile,
) -> Result<StoredFile, AppError> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("file name is required".to_string()));
    }

    let owner = store
        .find_by_id(owner_id)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // Compare in unsigned space: a declared size near u64::MAX must not
    // wrap into a negative number and slip past the gate.
    let used = usage::compute_usage(&owner).used_storage;
    if used.saturating_add(input.size) > owner.total_user_storage {
        let available = owner.total_user_storage.saturating_sub(used);
        return Err(AppError::QuotaExceeded(format!(
            "{available} bytes available, upload is {} bytes",
            input.size
        )));
    }

    let file = StoredFile {
        id: Uuid::new_v4(),
        owner_id,
        name: input.name.clone(),
        size: input.size,
        uploaded_at: Utc::now(),
    };
    store.add_file(owner_id, file.clone()).await?;
    Ok(file)
}

/// Delete a file record owned by `owner_id`.
pub async fn delete_file(store: &UserStore, owner_id: Uuid, file_id: Uuid) -> Result<User, AppError> {
    store.remove_file(owner_id, file_id).await
}
