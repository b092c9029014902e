//! In-memory user store.
//!
//! The persistence backend is deliberately a seam: handlers and services
//! only see this interface, so swapping in a real database later touches
//! nothing above it. Writes replace whole records, never mutate in place,
//! so concurrent readers never observe a partially updated user.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::file::StoredFile;
use crate::models::user::User;

#[derive(Debug, Clone, Default)]
pub struct UserStore {
    inner: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new user, rejecting duplicate email addresses.
    pub async fn insert(&self, user: User) -> Result<(), AppError> {
        let mut users = self.inner.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        users.insert(user.id, user);
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.inner.read().await.get(&id).cloned()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.inner
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    pub async fn all(&self) -> Vec<User> {
        self.inner.read().await.values().cloned().collect()
    }

    /// Append a file record to its owner, replacing the user atomically.
    pub async fn add_file(&self, owner_id: Uuid, file: StoredFile) -> Result<User, AppError> {
        let mut users = self.inner.write().await;
        let user = users
            .get(&owner_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        let mut updated = user.clone();
        updated.files.push(file);
        users.insert(owner_id, updated.clone());
        Ok(updated)
    }

    /// Remove a file record owned by `owner_id`.
    pub async fn remove_file(&self, owner_id: Uuid, file_id: Uuid) -> Result<User, AppError> {
        let mut users = self.inner.write().await;
        let user = users
            .get(&owner_id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        if !user.files.iter().any(|f| f.id == file_id) {
            return Err(AppError::NotFound("File not found".to_string()));
        }
        let mut updated = user.clone();
        updated.files.retain(|f| f.id != file_id);
        users.insert(owner_id, updated.clone());
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use chrono::Utc;

    fn sample_user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role: UserRole::Member,
            total_user_storage: 1000,
            files: vec![],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_and_lookup() {
        let store = UserStore::new();
        let user = sample_user("a@b.com");
        let id = user.id;
        store.insert(user).await.unwrap();
        assert!(store.find_by_id(id).await.is_some());
        assert!(store.find_by_email("a@b.com").await.is_some());
        assert!(store.find_by_email("missing@b.com").await.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let store = UserStore::new();
        store.insert(sample_user("a@b.com")).await.unwrap();
        let err = store.insert(sample_user("a@b.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn add_and_remove_file() {
        let store = UserStore::new();
        let user = sample_user("a@b.com");
        let owner_id = user.id;
        store.insert(user).await.unwrap();

        let file = StoredFile {
            id: Uuid::new_v4(),
            owner_id,
            name: "f.txt".to_string(),
            size: 10,
            uploaded_at: Utc::now(),
        };
        let file_id = file.id;
        let updated = store.add_file(owner_id, file).await.unwrap();
        assert_eq!(updated.files.len(), 1);

        let updated = store.remove_file(owner_id, file_id).await.unwrap();
        assert!(updated.files.is_empty());

        let err = store.remove_file(owner_id, file_id).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
