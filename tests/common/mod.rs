#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, routing::get};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use tinylink::api::handlers::health_handler;
use tinylink::api::middleware::owner::OwnerCookie;
use tinylink::api::routes::link_routes;
use tinylink::application::services::ShortenerService;
use tinylink::domain::entities::{NewUrlRecord, UrlRecord};
use tinylink::domain::repositories::UrlRepository;
use tinylink::error::AppError;
use tinylink::infrastructure::persistence::MemoryUrlRepository;
use tinylink::state::AppState;
use tinylink::utils::code_generator::RandomCodeGenerator;

pub const TEST_BASE_URL: &str = "https://tiny.test";

pub async fn create_test_url(pool: &PgPool, code: &str, url: &str, owner: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO urls (original_url, short_code, owner_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(url)
    .bind(code)
    .bind(owner)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Repository whose every call fails like an unreachable database.
pub struct UnavailableRepository;

#[async_trait]
impl UrlRepository for UnavailableRepository {
    async fn insert(&self, _new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        Err(unavailable())
    }

    async fn find_by_code(&self, _code: &str) -> Result<Option<UrlRecord>, AppError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}

fn unavailable() -> AppError {
    AppError::internal("Database error", json!({ "reason": "connection refused" }))
}

pub fn create_state_with(repository: Arc<dyn UrlRepository>) -> AppState {
    let shortener = ShortenerService::new(repository, Arc::new(RandomCodeGenerator::default()));

    AppState::new(
        Arc::new(shortener),
        TEST_BASE_URL,
        OwnerCookie::new(30, false),
    )
}

pub fn create_test_state() -> (AppState, Arc<MemoryUrlRepository>) {
    let repository = Arc::new(MemoryUrlRepository::new());
    let state = create_state_with(repository.clone());
    (state, repository)
}

/// Application routes without path normalization, as `TestServer` expects a `Router`.
pub fn create_test_app(state: AppState) -> Router {
    Router::new()
        .merge(link_routes(state.clone()))
        .route("/health", get(health_handler))
        .with_state(state)
}
