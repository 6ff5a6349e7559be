#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use url_map::application::services::{UpsertStrategy, UrlService};
use url_map::domain::clock::FixedClock;
use url_map::domain::repositories::UrlRepository;
use url_map::infrastructure::persistence::{InMemoryUrlRepository, PgUrlRepository};
use url_map::api::routes::routes;
use url_map::state::AppState;

pub const BASE_URL: &str = "http://localhost:8080";

/// 2024-01-15 10:30:00 UTC plus `seconds`.
pub fn at(seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap() + chrono::Duration::seconds(seconds)
}

pub fn create_service(
    repository: Arc<dyn UrlRepository>,
    strategy: UpsertStrategy,
) -> Arc<UrlService<dyn UrlRepository>> {
    Arc::new(UrlService::new(
        repository,
        Arc::new(FixedClock(at(0))),
        strategy,
    ))
}

pub fn create_memory_state(
    strategy: UpsertStrategy,
) -> (AppState, Arc<InMemoryUrlRepository>) {
    let repository = Arc::new(InMemoryUrlRepository::new());
    let service = create_service(repository.clone(), strategy);
    (AppState::new(service, BASE_URL), repository)
}

pub fn create_pg_state(pool: PgPool) -> AppState {
    let repository = Arc::new(PgUrlRepository::new(Arc::new(pool)));
    AppState::new(create_service(repository, UpsertStrategy::Atomic), BASE_URL)
}

pub fn create_server(state: AppState) -> TestServer {
    TestServer::new(routes().with_state(state)).unwrap()
}
