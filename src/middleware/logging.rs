//! Request logging middleware: records method, path, and body.

use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::header::CONTENT_LENGTH,
    middleware::Next,
    response::Response,
};

use crate::errors::AppError;

/// Bodies above this size are logged without their payload.
const MAX_LOGGED_BODY: usize = 64 * 1024;

/// Log every request's method, path, and (small, declared-length) body
/// before handing it on. The body is buffered and re-attached, so handlers
/// see it untouched.
pub async fn log_request(req: Request, next: Next) -> Result<Response, AppError> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let declared_len = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    let req = match declared_len {
        Some(len) if len > 0 && len <= MAX_LOGGED_BODY => {
            let (parts, body) = req.into_parts();
            let bytes = to_bytes(body, MAX_LOGGED_BODY)
                .await
                .map_err(|e| AppError::Validation(format!("unreadable request body: {e}")))?;
            tracing::debug!(
                method = %method,
                path = %path,
                body = %String::from_utf8_lossy(&bytes),
                "request"
            );
            Request::from_parts(parts, Body::from(bytes))
        }
        _ => {
            tracing::debug!(method = %method, path = %path, "request");
            req
        }
    };

    Ok(next.run(req).await)
}
