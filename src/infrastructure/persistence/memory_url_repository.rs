//! In-memory implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{UpsertOutcome, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::StoreError;

/// Process-local URL store using DashMap.
///
/// Behaves like the `url_map` table: `insert` rejects an existing id with
/// [`StoreError::Duplicate`], and `upsert` holds the shard lock for the id
/// while deciding, so it is atomic. Records do not survive a restart.
#[derive(Debug, Default)]
pub struct InMemoryUrlRepository {
    storage: DashMap<String, UrlRecord>,
}

impl InMemoryUrlRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<UrlRecord>, StoreError> {
        Ok(self.storage.get(id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, record: UrlRecord) -> Result<(), StoreError> {
        match self.storage.entry(record.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(record.id)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn touch(&self, id: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(mut entry) = self.storage.get_mut(id) {
            entry.updated_at = entry.updated_at.max(at);
        }
        Ok(())
    }

    async fn upsert(&self, record: UrlRecord) -> Result<UpsertOutcome, StoreError> {
        match self.storage.entry(record.id.clone()) {
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                existing.updated_at = existing.updated_at.max(record.updated_at);
                Ok(UpsertOutcome::Refreshed)
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(UpsertOutcome::Created)
            }
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryUrlRepository::new();

        repo.insert(UrlRecord::new("abcdefgh", "https://example.com", at(0)))
            .await
            .unwrap();

        let found = repo.find_by_id("abcdefgh").await.unwrap().unwrap();
        assert_eq!(found.redirect_url, "https://example.com");
        assert_eq!(found.created_at, at(0));
        assert!(repo.find_by_id("missing1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_is_unique_violation() {
        let repo = InMemoryUrlRepository::new();
        repo.insert(UrlRecord::new("abcdefgh", "https://a.com", at(0)))
            .await
            .unwrap();

        let err = repo
            .insert(UrlRecord::new("abcdefgh", "https://b.com", at(1)))
            .await
            .unwrap_err();

        assert!(err.is_unique_violation());
        let kept = repo.find_by_id("abcdefgh").await.unwrap().unwrap();
        assert_eq!(kept.redirect_url, "https://a.com");
    }

    #[tokio::test]
    async fn test_touch_never_moves_backwards() {
        let repo = InMemoryUrlRepository::new();
        repo.insert(UrlRecord::new("abcdefgh", "https://a.com", at(10)))
            .await
            .unwrap();

        repo.touch("abcdefgh", at(20)).await.unwrap();
        repo.touch("abcdefgh", at(15)).await.unwrap();

        let record = repo.find_by_id("abcdefgh").await.unwrap().unwrap();
        assert_eq!(record.created_at, at(10));
        assert_eq!(record.updated_at, at(20));
    }

    #[tokio::test]
    async fn test_touch_missing_is_noop() {
        let repo = InMemoryUrlRepository::new();
        repo.touch("abcdefgh", at(0)).await.unwrap();
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_creates_then_refreshes() {
        let repo = InMemoryUrlRepository::new();

        let first = repo
            .upsert(UrlRecord::new("abcdefgh", "https://a.com", at(0)))
            .await
            .unwrap();
        let second = repo
            .upsert(UrlRecord::new("abcdefgh", "https://other.com", at(5)))
            .await
            .unwrap();

        assert_eq!(first, UpsertOutcome::Created);
        assert_eq!(second, UpsertOutcome::Refreshed);
        assert_eq!(repo.len(), 1);

        let record = repo.find_by_id("abcdefgh").await.unwrap().unwrap();
        assert_eq!(record.redirect_url, "https://a.com");
        assert_eq!(record.created_at, at(0));
        assert_eq!(record.updated_at, at(5));
    }
}
