//! DAO for the `usage_statistics` table
//!
//! Per-day request counters for delivered derivatives. Rows accumulate until
//! the usage-indexing task pushes them into the search index and marks them
//! indexed.

use chrono::NaiveDate;
use sqlx::PgPool;

use super::DbResult;

/// Row of the `usage_statistics` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UsageRow {
    pub record_date: NaiveDate,
    pub pi: String,
    pub requests: i64,
    pub indexed: bool,
}

/// Increment today's request counter for a record
pub async fn increment(pool: &PgPool, pi: &str) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO usage_statistics (record_date, pi, requests, indexed)
        VALUES (CURRENT_DATE, $1, 1, false)
        ON CONFLICT (record_date, pi) DO UPDATE
            SET requests = usage_statistics.requests + 1,
                indexed = false
        "#,
    )
    .bind(pi)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch rows that have not been pushed to the search index yet
pub async fn fetch_unindexed(pool: &PgPool, limit: i64) -> DbResult<Vec<UsageRow>> {
    let rows = sqlx::query_as::<_, UsageRow>(
        r#"
        SELECT record_date, pi, requests, indexed
        FROM usage_statistics
        WHERE indexed = false
        ORDER BY record_date, pi
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Mark a usage row as pushed to the index
pub async fn mark_indexed(pool: &PgPool, record_date: NaiveDate, pi: &str) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE usage_statistics
        SET indexed = true
        WHERE record_date = $1 AND pi = $2
        "#,
    )
    .bind(record_date)
    .bind(pi)
    .execute(pool)
    .await?;

    Ok(())
}
