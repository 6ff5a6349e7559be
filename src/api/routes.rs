//! API route configuration.

use crate::api::handlers::{health_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// API routes.
///
/// # Endpoints
///
/// - `POST /url`    - Shorten a URL
/// - `GET  /health` - Store connectivity check
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/url", post(shorten_handler))
        .route("/health", get(health_handler))
}
