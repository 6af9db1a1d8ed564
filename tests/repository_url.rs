//! PostgreSQL repository tests.
//!
//! These need a running database: `DATABASE_URL=... cargo test -- --ignored`.

mod common;

use sqlx::PgPool;
use std::sync::Arc;
use tinylink::domain::entities::NewUrlRecord;
use tinylink::domain::repositories::UrlRepository;
use tinylink::error::AppError;
use tinylink::infrastructure::persistence::PgUrlRepository;

fn new_record(code: &str, url: &str) -> NewUrlRecord {
    NewUrlRecord {
        original_url: url.to_string(),
        short_code: code.to_string(),
        owner_id: "owner-1".to_string(),
    }
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_url(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    let record = repo
        .insert(new_record("test1234", "https://example.com"))
        .await
        .unwrap();

    assert!(record.id > 0);
    assert_eq!(record.short_code, "test1234");
    assert_eq!(record.original_url, "https://example.com");
    assert_eq!(record.owner_id, "owner-1");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_duplicate_code_is_conflict(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    repo.insert(new_record("dupe1234", "https://first.com"))
        .await
        .unwrap();
    let result = repo
        .insert(new_record("dupe1234", "https://second.com"))
        .await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));

    let stored = repo.find_by_code("dupe1234").await.unwrap().unwrap();
    assert_eq!(stored.original_url, "https://first.com");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_by_code(pool: PgPool) {
    let id = common::create_test_url(&pool, "abc12345", "https://example.com/x", "owner-2").await;
    let repo = PgUrlRepository::new(Arc::new(pool));

    let record = repo.find_by_code("abc12345").await.unwrap().unwrap();

    assert_eq!(record.id, id);
    assert_eq!(record.original_url, "https://example.com/x");
    assert_eq!(record.owner_id, "owner-2");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_by_code_is_case_sensitive(pool: PgPool) {
    common::create_test_url(&pool, "AbCd1234", "https://example.com", "owner").await;
    let repo = PgUrlRepository::new(Arc::new(pool));

    assert!(repo.find_by_code("abcd1234").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_by_code_not_found(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    let result = repo.find_by_code("notfound").await.unwrap();

    assert!(result.is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_count_and_latest(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    assert_eq!(repo.count().await.unwrap(), 0);
    assert!(repo.latest().await.unwrap().is_none());

    repo.insert(new_record("first123", "https://one.com"))
        .await
        .unwrap();
    repo.insert(new_record("second12", "https://two.com"))
        .await
        .unwrap();

    assert_eq!(repo.count().await.unwrap(), 2);
    assert_eq!(repo.latest().await.unwrap().unwrap().short_code, "second12");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_ping(pool: PgPool) {
    let repo = PgUrlRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
