//! Authentication service: password hashing, JWT issuance and validation,
//! registration and login.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::user::{RegisterUser, User, UserRole};
use crate::store::UserStore;

/// JWT claims embedded in access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub user_id: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Session issued on successful login or registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub id: Uuid,
    pub role: UserRole,
    pub expires_in: i64,
}

/// Hash a plaintext password with argon2id.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Generate a bearer token for a user.
pub fn generate_token(user: &User, jwt_secret: &str, expiry_secs: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let encoding_key = EncodingKey::from_secret(jwt_secret.as_bytes());

    let claims = Claims {
        sub: user.email.clone(),
        user_id: user.id.to_string(),
        role: user.role.as_str().to_string(),
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    jsonwebtoken::encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))
}

/// Validate a JWT and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

/// Register a new member account with the default storage quota.
pub async fn register(
    store: &UserStore,
    input: &RegisterUser,
    default_storage_bytes: u64,
    jwt_secret: &str,
    expiry_secs: i64,
) -> Result<AuthSession, AppError> {
    input
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = User {
        id: Uuid::new_v4(),
        email: input.email.clone(),
        password_hash: hash_password(&input.password)?,
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        role: UserRole::Member,
        total_user_storage: default_storage_bytes,
        files: vec![],
        created_at: Utc::now(),
    };

    let token = generate_token(&user, jwt_secret, expiry_secs)?;
    let session = AuthSession {
        token,
        id: user.id,
        role: user.role,
        expires_in: expiry_secs,
    };
    store.insert(user).await?;

    Ok(session)
}

/// Authenticate a user by email and password.
pub async fn login(
    store: &UserStore,
    email: &str,
    password: &str,
    jwt_secret: &str,
    expiry_secs: i64,
) -> Result<AuthSession, AppError> {
    let user = store
        .find_by_email(email)
        .await
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let token = generate_token(&user, jwt_secret, expiry_secs)?;
    Ok(AuthSession {
        token,
        id: user.id,
        role: user.role,
        expires_in: expiry_secs,
    })
}
