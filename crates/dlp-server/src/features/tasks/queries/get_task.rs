//! Get record task query

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use dlp_common::types::RecordTaskView;

use crate::db::record_tasks::{self, RecordTaskRow};
use crate::db::{DbError, DbResult};

/// Query to get a record task by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTaskQuery {
    pub id: Uuid,
}

/// Error type for the get-task query
#[derive(Debug, thiserror::Error)]
pub enum GetTaskError {
    #[error("Record task not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] DbError),
}

impl Request<Result<RecordTaskView, GetTaskError>> for GetTaskQuery {}

/// Convert a row into its JSON view
pub fn to_view(row: RecordTaskRow) -> DbResult<RecordTaskView> {
    let task_type = row.typed_task_type()?;
    let status = row.typed_status()?;

    Ok(RecordTaskView {
        id: row.id,
        task_type,
        pi: row.pi,
        status,
        message: row.message,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub async fn handle(pool: &PgPool, query: GetTaskQuery) -> Result<RecordTaskView, GetTaskError> {
    let row = record_tasks::get(pool, query.id)
        .await?
        .ok_or(GetTaskError::NotFound)?;

    Ok(to_view(row)?)
}
