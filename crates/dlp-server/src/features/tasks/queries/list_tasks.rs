//! List record tasks query

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use dlp_common::types::{RecordTaskView, TaskState, TaskType};

use crate::db::record_tasks;
use crate::db::DbError;
use crate::features::shared::pagination::{Paginated, PaginationParams};

use super::get_task::to_view;

/// Query to list record tasks, newest first
///
/// Pagination fields are inlined because the urlencoded deserializer cannot
/// handle numbers inside `#[serde(flatten)]` structs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTasksQuery {
    /// Filter by task type (DELETE_RECORD, PRERENDER_PDF, INDEX_USAGE)
    #[serde(default)]
    pub task_type: Option<String>,
    /// Filter by state (QUEUED, RUNNING, DONE, FAILED)
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
}

impl ListTasksQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Error type for the list-tasks query
#[derive(Debug, thiserror::Error)]
pub enum ListTasksError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Database(#[from] DbError),
}

impl Request<Result<Paginated<RecordTaskView>, ListTasksError>> for ListTasksQuery {}

pub async fn handle(
    pool: &PgPool,
    query: ListTasksQuery,
) -> Result<Paginated<RecordTaskView>, ListTasksError> {
    let pagination = query.pagination();
    pagination
        .validate()
        .map_err(|e| ListTasksError::Validation(e.to_string()))?;

    let task_type = query
        .task_type
        .as_deref()
        .map(str::parse::<TaskType>)
        .transpose()
        .map_err(ListTasksError::Validation)?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<TaskState>)
        .transpose()
        .map_err(ListTasksError::Validation)?;

    let rows = record_tasks::list(
        pool,
        task_type,
        status,
        pagination.per_page(),
        pagination.offset(),
    )
    .await?;
    let total = record_tasks::count(pool, task_type, status).await?;

    let items = rows.into_iter().map(to_view).collect::<Result<Vec<_>, _>>()?;

    Ok(Paginated::from_items(items, &pagination, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_are_optional() {
        let query: ListTasksQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(query.task_type.is_none());
        assert!(query.status.is_none());
    }
}
