//! User model with role-based access control.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::file::StoredFile;

/// Account role carried in the JWT `role` claim.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Member,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Member => "member",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "member" => Ok(UserRole::Member),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Full user record held in the store (includes password_hash — never
/// serialize to API).
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    /// Purchased storage quota in bytes.
    pub total_user_storage: u64,
    pub files: Vec<StoredFile>,
    pub created_at: DateTime<Utc>,
}

/// User response DTO — excludes password_hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub total_user_storage: u64,
    pub files: Vec<StoredFile>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            role: u.role,
            total_user_storage: u.total_user_storage,
            files: u.files,
            created_at: u.created_at,
        }
    }
}

/// Registration payload. Mirrors the signup form rules: valid email,
/// password of 8–100 chars with at least one uppercase letter and one
/// special character.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(
        length(min = 8, max = 100, message = "password must be 8-100 characters"),
        custom(function = validate_password_strength)
    )]
    pub password: String,
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
}

fn validate_password_strength(password: &str) -> Result<(), validator::ValidationError> {
    let has_uppercase = password.chars().any(|c| c.is_ascii_uppercase());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());
    if has_uppercase && has_special {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("password_strength");
        err.message =
            Some("password needs at least one uppercase letter and one special character".into());
        Err(err)
    }
}
