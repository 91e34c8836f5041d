//! DAO for the `download_jobs` table
//!
//! A download job is keyed by the deterministic identifier hash of its
//! creation criteria, which makes creation idempotent: repeated requests for
//! the same derivative land on the same row.

use chrono::{DateTime, Utc};
use dlp_common::types::JobStatus;
use sqlx::PgPool;

use super::{DbError, DbResult};

/// Row of the `download_jobs` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DownloadJobRow {
    pub identifier: String,
    pub kind: String,
    pub pi: String,
    pub log_id: Option<String>,
    pub status: String,
    pub message: Option<String>,
    pub ttl_ms: i64,
    pub last_requested: DateTime<Utc>,
    pub observers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DownloadJobRow {
    /// Typed status of this row
    pub fn job_status(&self) -> DbResult<JobStatus> {
        self.status
            .parse()
            .map_err(|e: String| DbError::Decode(format!("download job {}: {e}", self.identifier)))
    }
}

/// Parameters for creating or refreshing a download job
#[derive(Debug, Clone)]
pub struct NewDownloadJob<'a> {
    pub identifier: &'a str,
    pub kind: &'a str,
    pub pi: &'a str,
    pub log_id: Option<&'a str>,
    pub ttl_ms: i64,
}

/// Fetch a job by its identifier
pub async fn get_by_identifier(pool: &PgPool, identifier: &str) -> DbResult<Option<DownloadJobRow>> {
    let row = sqlx::query_as::<_, DownloadJobRow>(
        r#"
        SELECT identifier, kind, pi, log_id, status, message, ttl_ms,
               last_requested, observers, created_at, updated_at
        FROM download_jobs
        WHERE identifier = $1
        "#,
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Create the job row, or refresh `last_requested` when it already exists.
///
/// Returns the row and whether it was newly created. The identifier is the
/// idempotency key: concurrent requests for the same derivative resolve to
/// one row.
pub async fn upsert_request(
    pool: &PgPool,
    job: &NewDownloadJob<'_>,
) -> DbResult<(DownloadJobRow, bool)> {
    let existing = get_by_identifier(pool, job.identifier).await?;
    let created = existing.is_none();

    let row = sqlx::query_as::<_, DownloadJobRow>(
        r#"
        INSERT INTO download_jobs
            (identifier, kind, pi, log_id, status, ttl_ms, last_requested, observers)
        VALUES ($1, $2, $3, $4, $5, $6, now(), '{}')
        ON CONFLICT (identifier) DO UPDATE
            SET last_requested = now(),
                updated_at = now()
        RETURNING identifier, kind, pi, log_id, status, message, ttl_ms,
                  last_requested, observers, created_at, updated_at
        "#,
    )
    .bind(job.identifier)
    .bind(job.kind)
    .bind(job.pi)
    .bind(job.log_id)
    .bind(JobStatus::Initialized.to_string())
    .bind(job.ttl_ms)
    .fetch_one(pool)
    .await?;

    Ok((row, created))
}

/// Add an observer email address unless it is already registered
pub async fn add_observer(pool: &PgPool, identifier: &str, email: &str) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE download_jobs
        SET observers = array_append(observers, $2),
            updated_at = now()
        WHERE identifier = $1
          AND NOT observers @> ARRAY[$2]
        "#,
    )
    .bind(identifier)
    .bind(email)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update a job's status, replacing its message
pub async fn update_status(
    pool: &PgPool,
    identifier: &str,
    status: JobStatus,
    message: Option<&str>,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE download_jobs
        SET status = $2, message = $3, updated_at = now()
        WHERE identifier = $1
        "#,
    )
    .bind(identifier)
    .bind(status.to_string())
    .bind(message)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("download job", identifier));
    }

    Ok(())
}

/// Position of an unfinished job in the queue (1-based, ordered by creation).
///
/// Finished jobs report 0 (`READY`) or -1 (`ERROR`).
pub async fn queue_position(pool: &PgPool, row: &DownloadJobRow) -> DbResult<i64> {
    match row.job_status()? {
        JobStatus::Ready => Ok(0),
        JobStatus::Error => Ok(-1),
        JobStatus::Initialized | JobStatus::Waiting => {
            let position: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*)
                FROM download_jobs
                WHERE status IN ('INITIALIZED', 'WAITING')
                  AND created_at <= $1
                "#,
            )
            .bind(row.created_at)
            .fetch_one(pool)
            .await?;

            Ok(position)
        },
    }
}

/// List jobs, optionally filtered by status, newest first
pub async fn list(
    pool: &PgPool,
    status: Option<JobStatus>,
    limit: i64,
    offset: i64,
) -> DbResult<Vec<DownloadJobRow>> {
    let rows = sqlx::query_as::<_, DownloadJobRow>(
        r#"
        SELECT identifier, kind, pi, log_id, status, message, ttl_ms,
               last_requested, observers, created_at, updated_at
        FROM download_jobs
        WHERE ($1::text IS NULL OR status = $1)
        ORDER BY last_requested DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(status.map(|s| s.to_string()))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count jobs, optionally filtered by status
pub async fn count(pool: &PgPool, status: Option<JobStatus>) -> DbResult<i64> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM download_jobs
        WHERE ($1::text IS NULL OR status = $1)
        "#,
    )
    .bind(status.map(|s| s.to_string()))
    .fetch_one(pool)
    .await?;

    Ok(total)
}

/// Delete jobs whose TTL has elapsed, returning the removed rows so the
/// caller can clean up their files
pub async fn delete_expired(pool: &PgPool) -> DbResult<Vec<DownloadJobRow>> {
    let rows = sqlx::query_as::<_, DownloadJobRow>(
        r#"
        DELETE FROM download_jobs
        WHERE last_requested + (ttl_ms * interval '1 millisecond') < now()
        RETURNING identifier, kind, pi, log_id, status, message, ttl_ms,
                  last_requested, observers, created_at, updated_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
