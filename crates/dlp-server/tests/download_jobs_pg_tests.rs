//! Database integration tests for the download-job DAO
//!
//! These tests need a running PostgreSQL with the migrations applied and
//! DATABASE_URL pointing at it, so they are ignored by default:
//!
//! ```sh
//! DATABASE_URL=postgresql://localhost/dlp_test cargo test -- --ignored
//! ```

use dlp_common::types::JobStatus;
use dlp_server::db::download_jobs::{self, NewDownloadJob};
use dlp_server::features::downloads::types::DownloadJob;

async fn test_pool() -> sqlx::PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for these tests");
    let pool = sqlx::PgPool::connect(&url).await.expect("connect to test database");
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("migrations apply");
    pool
}

fn unique_pi(tag: &str) -> String {
    format!("TEST_{}_{}", tag, uuid::Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn duplicate_request_does_not_create_second_row() {
    let pool = test_pool().await;
    let pi = unique_pi("dup");
    let identifier = DownloadJob::job_identifier(&pi, Some("LOG_0000"));
    let job = NewDownloadJob {
        identifier: &identifier,
        kind: "pdf",
        pi: &pi,
        log_id: Some("LOG_0000"),
        ttl_ms: 60_000,
    };

    let (first, created_first) = download_jobs::upsert_request(&pool, &job).await.unwrap();
    let (second, created_second) = download_jobs::upsert_request(&pool, &job).await.unwrap();

    assert!(created_first);
    assert!(!created_second);
    assert_eq!(first.identifier, second.identifier);
    assert!(second.last_requested >= first.last_requested);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM download_jobs WHERE identifier = $1")
        .bind(&identifier)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn status_transitions_are_persisted() {
    let pool = test_pool().await;
    let pi = unique_pi("status");
    let identifier = DownloadJob::job_identifier(&pi, None);
    let job = NewDownloadJob {
        identifier: &identifier,
        kind: "pdf",
        pi: &pi,
        log_id: None,
        ttl_ms: 60_000,
    };

    download_jobs::upsert_request(&pool, &job).await.unwrap();

    for status in [JobStatus::Waiting, JobStatus::Ready, JobStatus::Error] {
        download_jobs::update_status(&pool, &identifier, status, None)
            .await
            .unwrap();
        let row = download_jobs::get_by_identifier(&pool, &identifier)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.job_status().unwrap(), status);
    }

    // A job in ERROR state goes back to WAITING before a new render attempt
    download_jobs::update_status(&pool, &identifier, JobStatus::Waiting, None)
        .await
        .unwrap();
    let row = download_jobs::get_by_identifier(&pool, &identifier)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.job_status().unwrap(), JobStatus::Waiting);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn observers_are_deduplicated() {
    let pool = test_pool().await;
    let pi = unique_pi("observers");
    let identifier = DownloadJob::job_identifier(&pi, None);
    let job = NewDownloadJob {
        identifier: &identifier,
        kind: "pdf",
        pi: &pi,
        log_id: None,
        ttl_ms: 60_000,
    };

    download_jobs::upsert_request(&pool, &job).await.unwrap();
    download_jobs::add_observer(&pool, &identifier, "me@he.re").await.unwrap();
    download_jobs::add_observer(&pool, &identifier, "me@he.re").await.unwrap();
    download_jobs::add_observer(&pool, &identifier, "you@he.re").await.unwrap();

    let row = download_jobs::get_by_identifier(&pool, &identifier)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.observers, vec!["me@he.re".to_string(), "you@he.re".to_string()]);
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL (set DATABASE_URL)"]
async fn expired_jobs_are_swept() {
    let pool = test_pool().await;
    let pi = unique_pi("expired");
    let identifier = DownloadJob::job_identifier(&pi, None);
    let job = NewDownloadJob {
        identifier: &identifier,
        kind: "pdf",
        pi: &pi,
        log_id: None,
        ttl_ms: 1,
    };

    download_jobs::upsert_request(&pool, &job).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let removed = download_jobs::delete_expired(&pool).await.unwrap();
    assert!(removed.iter().any(|row| row.identifier == identifier));

    let gone = download_jobs::get_by_identifier(&pool, &identifier).await.unwrap();
    assert!(gone.is_none());
}
