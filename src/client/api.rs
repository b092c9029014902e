//! Ports for the external Auth and Users services, plus their reqwest
//! implementations against the Cumulus HTTP API.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

use crate::models::user::{UserResponse, UserRole};

/// How an external service call failed. The loader classifies 401
/// separately from everything else, so the distinction is drawn here.
#[derive(Debug, thiserror::Error)]
pub enum ApiFailure {
    #[error("unauthorized")]
    Unauthorized,
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Decoded role claim returned by token verification.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleClaims {
    pub subject: Uuid,
    pub role: UserRole,
}

/// Token verification port of the Auth service.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<RoleClaims, ApiFailure>;
}

/// Record-fetch port of the Users service.
#[async_trait]
pub trait UsersApi: Send + Sync {
    /// Admin scope: every user with their files.
    async fn get_all_users(&self, token: &str) -> Result<Vec<UserResponse>, ApiFailure>;

    /// Self scope: one user's record, `None` if it does not exist.
    async fn get_user_data(
        &self,
        id: Uuid,
        token: &str,
    ) -> Result<Option<UserResponse>, ApiFailure>;
}

/// Deserialization side of the API response envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    error: Option<EnvelopeError>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeError {
    code: String,
    message: String,
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, ApiFailure> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ApiFailure::Transport(e.to_string()))
}

async fn read_envelope<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiFailure> {
    if response.status() == StatusCode::UNAUTHORIZED {
        return Err(ApiFailure::Unauthorized);
    }
    let status = response.status();
    let envelope: Envelope<T> = response
        .json()
        .await
        .map_err(|e| ApiFailure::Transport(e.to_string()))?;

    match envelope.data {
        Some(data) => Ok(data),
        None => {
            let detail = envelope
                .error
                .map(|e| format!("{}: {}", e.code, e.message))
                .unwrap_or_else(|| format!("empty response ({status})"));
            Err(ApiFailure::Transport(detail))
        }
    }
}

/// Auth service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiFailure> {
        Ok(Self {
            base_url: base_url.into(),
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn verify_token(&self, token: &str) -> Result<RoleClaims, ApiFailure> {
        let response = self
            .client
            .get(format!("{}/auth/verify", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiFailure::Transport(e.to_string()))?;
        read_envelope(response).await
    }
}

/// Users service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpUsersApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpUsersApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiFailure> {
        Ok(Self {
            base_url: base_url.into(),
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl UsersApi for HttpUsersApi {
    async fn get_all_users(&self, token: &str) -> Result<Vec<UserResponse>, ApiFailure> {
        let response = self
            .client
            .get(format!("{}/users", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiFailure::Transport(e.to_string()))?;
        read_envelope(response).await
    }

    async fn get_user_data(
        &self,
        id: Uuid,
        token: &str,
    ) -> Result<Option<UserResponse>, ApiFailure> {
        let response = self
            .client
            .get(format!("{}/users/{id}", self.base_url))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiFailure::Transport(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_envelope(response).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_extracts_data() {
        let json = r#"{"data": 42, "error": null}"#;
        let envelope: Envelope<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data, Some(42));
    }

    #[test]
    fn envelope_extracts_error_detail() {
        let json = r#"{"data": null, "error": {"code": "FORBIDDEN", "message": "nope"}}"#;
        let envelope: Envelope<u32> = serde_json::from_str(json).unwrap();
        assert!(envelope.data.is_none());
        let err = envelope.error.unwrap();
        assert_eq!(err.code, "FORBIDDEN");
        assert_eq!(err.message, "nope");
    }
}
