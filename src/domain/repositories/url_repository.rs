//! Repository trait for URL record persistence.

use crate::domain::entities::{UpsertOutcome, UrlRecord};
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Store collaborator for [`UrlRecord`]s, keyed by short code.
///
/// Every method is a single round trip. Errors are the store's own failures,
/// passed through without translation.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - process-local map
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Finds the record stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    async fn find_by_id(&self, id: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Fails with a unique violation (see [`StoreError::is_unique_violation`])
    /// if a record with the same `id` already exists.
    async fn insert(&self, record: UrlRecord) -> Result<(), StoreError>;

    /// Refreshes `updated_at` of the record stored under `id`.
    ///
    /// `updated_at` never moves backwards: an older `at` leaves it unchanged.
    /// `redirect_url` and `created_at` are not touched. Refreshing a missing id
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the statement fails.
    async fn touch(&self, id: &str, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Inserts `record`, or refreshes `updated_at` of the existing record
    /// with the same `id`, as one atomic operation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the statement fails.
    async fn upsert(&self, record: UrlRecord) -> Result<UpsertOutcome, StoreError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be reached.
    async fn ping(&self) -> Result<(), StoreError>;
}
