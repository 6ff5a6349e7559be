//! Short code creation and persistence.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::clock::Clock;
use crate::domain::entities::{UpsertOutcome, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::StoreError;
use crate::utils::code_generator::generate_code;

/// How [`UrlService::upsert`] talks to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpsertStrategy {
    /// One `INSERT ... ON CONFLICT` statement. No race between concurrent
    /// writers of the same code.
    #[default]
    Atomic,
    /// Read the record, then insert or refresh it: one read and one write.
    ///
    /// Two concurrent calls for the same code can both miss on the read;
    /// the later insert then fails with the store's unique violation.
    CheckThenAct,
}

impl UpsertStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpsertStrategy::Atomic => "atomic",
            UpsertStrategy::CheckThenAct => "check-then-act",
        }
    }
}

impl fmt::Display for UpsertStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpsertStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "atomic" => Ok(UpsertStrategy::Atomic),
            "check-then-act" | "check_then_act" => Ok(UpsertStrategy::CheckThenAct),
            other => Err(format!(
                "unknown upsert strategy '{other}', expected 'atomic' or 'check-then-act'"
            )),
        }
    }
}

/// Errors returned by [`UrlService::shorten`] and [`UrlService::shorten_at`].
#[derive(Debug, thiserror::Error)]
pub enum ShortenError {
    #[error("URL must not be empty")]
    EmptyUrl,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of shortening a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    pub code: String,
    pub outcome: UpsertOutcome,
    pub timestamp: DateTime<Utc>,
}

/// Turns URLs into short codes and records them once per code.
///
/// Holds no mutable state; the repository and clock are injected once at
/// startup and shared across requests.
pub struct UrlService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    strategy: UpsertStrategy,
}

impl<R: UrlRepository + ?Sized> UrlService<R> {
    /// Creates a new URL service.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>, strategy: UpsertStrategy) -> Self {
        Self {
            repository,
            clock,
            strategy,
        }
    }

    pub fn strategy(&self) -> UpsertStrategy {
        self.strategy
    }

    /// Shortens `url`, stamping the record with the current time.
    ///
    /// # Errors
    ///
    /// See [`Self::shorten_at`].
    pub async fn shorten(&self, url: &str) -> Result<Shortened, ShortenError> {
        self.shorten_at(url, self.clock.now()).await
    }

    /// Shortens `url`, stamping the record with `timestamp`.
    ///
    /// The same URL always yields the same code. Writing it again only
    /// refreshes `updated_at`. A different URL whose code collides with an
    /// existing record refreshes that record and leaves its `redirect_url`
    /// in place.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenError::EmptyUrl`] for an empty `url`, before any
    /// store access. Store failures are returned as [`ShortenError::Store`].
    #[tracing::instrument(skip(self, timestamp))]
    pub async fn shorten_at(
        &self,
        url: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Shortened, ShortenError> {
        if url.is_empty() {
            return Err(ShortenError::EmptyUrl);
        }

        let code = generate_code(url);
        let outcome = self.upsert(&code, url, timestamp).await?;

        Ok(Shortened {
            code,
            outcome,
            timestamp,
        })
    }

    /// Records `(id, redirect_url)` at `timestamp`.
    ///
    /// Inserts with `created_at == updated_at == timestamp` when `id` is new,
    /// otherwise refreshes `updated_at` of the existing record only.
    ///
    /// # Errors
    ///
    /// Store failures are returned unmodified. Nothing is retried.
    #[tracing::instrument(skip(self, redirect_url), fields(strategy = self.strategy.as_str()))]
    pub async fn upsert(
        &self,
        id: &str,
        redirect_url: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<UpsertOutcome, StoreError> {
        let result = match self.strategy {
            UpsertStrategy::Atomic => {
                self.repository
                    .upsert(UrlRecord::new(id, redirect_url, timestamp))
                    .await
            }
            UpsertStrategy::CheckThenAct => {
                self.check_then_act(id, redirect_url, timestamp).await
            }
        };

        match &result {
            Ok(outcome) => tracing::debug!(outcome = outcome.as_str(), "url record stored"),
            Err(e) => tracing::warn!(error = %e, "failed to store url record"),
        }

        result
    }

    async fn check_then_act(
        &self,
        id: &str,
        redirect_url: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<UpsertOutcome, StoreError> {
        if self.repository.find_by_id(id).await?.is_some() {
            self.repository.touch(id, timestamp).await?;
            return Ok(UpsertOutcome::Refreshed);
        }

        self.repository
            .insert(UrlRecord::new(id, redirect_url, timestamp))
            .await?;
        Ok(UpsertOutcome::Created)
    }

    /// Looks up the record for a short code.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the query fails.
    pub async fn find(&self, id: &str) -> Result<Option<UrlRecord>, StoreError> {
        self.repository.find_by_id(id).await
    }

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be reached.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.repository.ping().await
    }
}
