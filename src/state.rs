//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::UrlService;
use crate::domain::repositories::UrlRepository;

/// State shared by all request handlers.
///
/// Cloned per request; the service itself sits behind an [`Arc`].
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService<dyn UrlRepository>>,
    /// Prefix joined with a short code to form the returned short URL.
    pub base_url: String,
}

impl AppState {
    pub fn new(url_service: Arc<UrlService<dyn UrlRepository>>, base_url: impl Into<String>) -> Self {
        Self {
            url_service,
            base_url: base_url.into(),
        }
    }

    /// Builds the public short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        join_short_url(&self.base_url, code)
    }
}

/// Joins a base URL and a short code, tolerating a trailing slash on the base.
pub fn join_short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_short_url() {
        assert_eq!(
            join_short_url("http://localhost:8080", "hBreFgHC"),
            "http://localhost:8080/hBreFgHC"
        );
        assert_eq!(
            join_short_url("https://s.example.com/", "hBreFgHC"),
            "https://s.example.com/hBreFgHC"
        );
    }
}
