//! Route definitions for the Cumulus API.

pub mod auth;
pub mod files;
pub mod health;
pub mod users;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::logging::log_request;
use crate::AppState;

/// Assemble the full application router: `/auth`, `/users`, `/files` route
/// groups behind request logging, permissive CORS, and tracing.
pub fn app(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/verify", get(auth::verify));

    let user_routes = Router::new()
        .route("/", get(users::all_users))
        .route("/{id}", get(users::user_by_id))
        .route("/{id}/usage", get(users::user_usage));

    let file_routes = Router::new()
        .route("/", post(files::upload).get(files::own_files))
        .route("/{id}", delete(files::remove));

    Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/files", file_routes)
        .route("/health/live", get(health::live))
        .layer(axum_middleware::from_fn(log_request))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
