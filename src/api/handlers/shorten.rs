//! Handler for the link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL and stores the mapping.
///
/// # Endpoint
///
/// `POST /url`
///
/// Shortening the same URL again returns the same short URL and refreshes
/// the stored record's `updated_at`.
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/a" }
/// ```
///
/// # Response
///
/// ```json
/// { "ts": 1705314600000000000, "url": "http://localhost:8080/hBreFgHC" }
/// ```
///
/// # Errors
///
/// - 400 if the body cannot be decoded or `url` is empty
/// - 409 if a concurrent writer inserted the same code first
/// - 500 on any other store failure
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::bad_request("Failed to decode request.", json!({ "reason": e.body_text() }))
    })?;
    payload.validate()?;

    let shortened = state.url_service.shorten(&payload.url).await?;

    tracing::info!(
        code = %shortened.code,
        outcome = shortened.outcome.as_str(),
        "url shortened"
    );

    Ok(Json(ShortenResponse {
        ts: shortened.timestamp.timestamp_nanos_opt().unwrap_or(i64::MAX),
        url: state.short_url(&shortened.code),
    }))
}
