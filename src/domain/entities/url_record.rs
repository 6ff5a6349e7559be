//! URL record entity: one short code mapped to its redirect target.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A persisted short code to URL mapping.
///
/// `id` is derived from `redirect_url` by
/// [`generate_code`](crate::utils::code_generator::generate_code). `created_at`
/// never changes after the first write; `updated_at` moves forward each time
/// the same code is written again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlRecord {
    pub id: String,
    pub redirect_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a record for its first insertion, with both timestamps equal.
    pub fn new(id: impl Into<String>, redirect_url: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            redirect_url: redirect_url.into(),
            created_at: at,
            updated_at: at,
        }
    }

    /// Returns true if the record has been written more than once.
    pub fn is_refreshed(&self) -> bool {
        self.updated_at > self.created_at
    }
}

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    /// No record existed for the code; one was inserted.
    Created,
    /// A record existed; only its `updated_at` was refreshed.
    Refreshed,
}

impl UpsertOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpsertOutcome::Created => "created",
            UpsertOutcome::Refreshed => "refreshed",
        }
    }
}
