//! DAO for the `record_tasks` table
//!
//! Record tasks track queued background work (record deletion, page
//! prerendering, usage indexing) so clients can poll their outcome instead
//! of blocking on the request thread.

use chrono::{DateTime, Utc};
use dlp_common::types::{TaskState, TaskType};
use sqlx::PgPool;
use uuid::Uuid;

use super::{DbError, DbResult};

/// Row of the `record_tasks` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecordTaskRow {
    pub id: Uuid,
    pub task_type: String,
    pub pi: Option<String>,
    pub status: String,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordTaskRow {
    /// Typed task type of this row
    pub fn typed_task_type(&self) -> DbResult<TaskType> {
        self.task_type
            .parse()
            .map_err(|e: String| DbError::Decode(format!("record task {}: {e}", self.id)))
    }

    /// Typed state of this row
    pub fn typed_status(&self) -> DbResult<TaskState> {
        self.status
            .parse()
            .map_err(|e: String| DbError::Decode(format!("record task {}: {e}", self.id)))
    }
}

/// Insert a new queued task, returning its id
pub async fn create(pool: &PgPool, task_type: TaskType, pi: Option<&str>) -> DbResult<Uuid> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO record_tasks (id, task_type, pi, status)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(id)
    .bind(task_type.to_string())
    .bind(pi)
    .bind(TaskState::Queued.to_string())
    .execute(pool)
    .await?;

    Ok(id)
}

/// Fetch a task by id
pub async fn get(pool: &PgPool, id: Uuid) -> DbResult<Option<RecordTaskRow>> {
    let row = sqlx::query_as::<_, RecordTaskRow>(
        r#"
        SELECT id, task_type, pi, status, message, created_at, updated_at
        FROM record_tasks
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Move a task to a new state, replacing its message
pub async fn set_state(
    pool: &PgPool,
    id: Uuid,
    state: TaskState,
    message: Option<&str>,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE record_tasks
        SET status = $2, message = $3, updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(state.to_string())
    .bind(message)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("record task", &id.to_string()));
    }

    Ok(())
}

/// List tasks, optionally filtered by type and state, newest first
pub async fn list(
    pool: &PgPool,
    task_type: Option<TaskType>,
    status: Option<TaskState>,
    limit: i64,
    offset: i64,
) -> DbResult<Vec<RecordTaskRow>> {
    let rows = sqlx::query_as::<_, RecordTaskRow>(
        r#"
        SELECT id, task_type, pi, status, message, created_at, updated_at
        FROM record_tasks
        WHERE ($1::text IS NULL OR task_type = $1)
          AND ($2::text IS NULL OR status = $2)
        ORDER BY created_at DESC
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(task_type.map(|t| t.to_string()))
    .bind(status.map(|s| s.to_string()))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count tasks, optionally filtered by type and state
pub async fn count(
    pool: &PgPool,
    task_type: Option<TaskType>,
    status: Option<TaskState>,
) -> DbResult<i64> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM record_tasks
        WHERE ($1::text IS NULL OR task_type = $1)
          AND ($2::text IS NULL OR status = $2)
        "#,
    )
    .bind(task_type.map(|t| t.to_string()))
    .bind(status.map(|s| s.to_string()))
    .fetch_one(pool)
    .await?;

    Ok(total)
}
