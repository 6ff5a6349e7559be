mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use url_map::application::services::UpsertStrategy;
use url_map::domain::entities::{UpsertOutcome, UrlRecord};
use url_map::domain::repositories::UrlRepository;
use url_map::error::StoreError;
use url_map::state::AppState;

/// A store whose every call fails like an unreachable database.
struct UnreachableRepository;

fn unreachable() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl UrlRepository for UnreachableRepository {
    async fn find_by_id(&self, _id: &str) -> Result<Option<UrlRecord>, StoreError> {
        Err(unreachable())
    }

    async fn insert(&self, _record: UrlRecord) -> Result<(), StoreError> {
        Err(unreachable())
    }

    async fn touch(&self, _id: &str, _at: DateTime<Utc>) -> Result<(), StoreError> {
        Err(unreachable())
    }

    async fn upsert(&self, _record: UrlRecord) -> Result<UpsertOutcome, StoreError> {
        Err(unreachable())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(unreachable())
    }
}

fn unreachable_state() -> AppState {
    let service = common::create_service(Arc::new(UnreachableRepository), UpsertStrategy::Atomic);
    AppState::new(service, common::BASE_URL)
}

#[tokio::test]
async fn test_health_endpoint_success() {
    let (state, _repo) = common::create_memory_state(UpsertStrategy::Atomic);
    let server = common::create_server(state);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["checks"]["database"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_store_unreachable() {
    let server = common::create_server(unreachable_state());

    let response = server.get("/health").expect_failure().await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
    assert!(
        json["checks"]["database"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Could not connect to Postgres.")
    );
}

#[tokio::test]
async fn test_shorten_store_failure_is_internal_error() {
    let server = common::create_server(unreachable_state());

    let response = server
        .post("/url")
        .json(&serde_json::json!({ "url": "https://example.com/a" }))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let json = response.json::<serde_json::Value>();
    let message = json["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Unable to shorten URL: "));
}
