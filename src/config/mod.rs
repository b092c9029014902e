use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_token_expiry_secs: i64,
    /// Storage quota granted to newly registered users, in bytes.
    pub default_storage_bytes: u64,
    /// Timeout applied to outbound calls made by the dashboard client ports.
    pub request_timeout_secs: u64,
    pub frontend_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .unwrap_or(4000),
            jwt_secret: env::var("JWT_SECRET")?,
            jwt_token_expiry_secs: env::var("JWT_TOKEN_EXPIRY_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .unwrap_or(3600),
            default_storage_bytes: env::var("DEFAULT_STORAGE_BYTES")
                // 20 GiB starter plan
                .unwrap_or_else(|_| "21474836480".to_string())
                .parse()
                .unwrap_or(21_474_836_480),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}
