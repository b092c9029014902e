//! Shared application state fed by successful loads.
//!
//! Single-writer: only the dashboard loader updates it. Writes are
//! whole-value replacements, so concurrent readers never see a partially
//! updated record.

use std::sync::RwLock;

use crate::models::user::UserResponse;
use crate::services::usage::StorageUsage;

#[derive(Debug, Default)]
pub struct SharedState {
    user: RwLock<Option<UserResponse>>,
    storage: RwLock<Option<StorageUsage>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached user record.
    pub fn update(&self, user: UserResponse) {
        *self.user.write().expect("shared state poisoned") = Some(user);
    }

    /// Replace the cached storage usage.
    pub fn update_storage(&self, usage: StorageUsage) {
        *self.storage.write().expect("shared state poisoned") = Some(usage);
    }

    pub fn user(&self) -> Option<UserResponse> {
        self.user.read().expect("shared state poisoned").clone()
    }

    pub fn storage(&self) -> Option<StorageUsage> {
        *self.storage.read().expect("shared state poisoned")
    }

    /// Drop everything, e.g. on logout.
    pub fn reset(&self) {
        *self.user.write().expect("shared state poisoned") = None;
        *self.storage.write().expect("shared state poisoned") = None;
    }
}
