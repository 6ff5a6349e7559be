//! DTOs for the shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The long URL. Only emptiness is checked; the string is hashed as-is.
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing URL parameter"))]
    pub url: String,
}

/// Response for a stored short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    /// Timestamp written to the record, in nanoseconds since the Unix epoch.
    pub ts: i64,
    /// Full short URL (`BASE_URL/code`).
    pub url: String,
}
