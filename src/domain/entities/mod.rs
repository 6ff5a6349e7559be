//! Core domain entities.
//!
//! - [`UrlRecord`] - A short code mapped to its redirect URL
//! - [`UpsertOutcome`] - Whether a write created or refreshed a record

pub mod url_record;

pub use url_record::{UpsertOutcome, UrlRecord};
