//! Record task routes
//!
//! Public read-only routes for polling queued background work, plus the
//! enqueue endpoint for usage-statistics indexing.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use dlp_common::types::TaskType;

use crate::db::record_tasks;
use crate::error::AppError;
use crate::features::FeatureState;
use crate::tasks::messages::IndexUsageTask;

use super::queries::{
    get_task::handle as handle_get_task,
    list_tasks::handle as handle_list_tasks,
    GetTaskError, GetTaskQuery, ListTasksError, ListTasksQuery,
};

/// Create record task routes
pub fn tasks_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_tasks))
        .route("/index-usage", post(enqueue_index_usage))
        .route("/:id", get(get_task))
}

/// Get a record task by id
///
/// GET /tasks/:id
async fn get_task(
    State(state): State<FeatureState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let view = handle_get_task(&state.db, GetTaskQuery { id })
        .await
        .map_err(|e| match e {
            GetTaskError::NotFound => AppError::NotFound("Record task not found".to_string()),
            GetTaskError::Database(e) => e.into(),
        })?;

    Ok((StatusCode::OK, Json(view)).into_response())
}

/// List record tasks
///
/// GET /tasks?task_type=DELETE_RECORD&status=QUEUED
async fn list_tasks(
    State(state): State<FeatureState>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Response, AppError> {
    let page = handle_list_tasks(&state.db, query).await.map_err(|e| match e {
        ListTasksError::Validation(msg) => AppError::Validation(msg),
        ListTasksError::Database(e) => e.into(),
    })?;

    Ok((StatusCode::OK, Json(page)).into_response())
}

/// Enqueue a usage-statistics indexing task
///
/// POST /tasks/index-usage
async fn enqueue_index_usage(State(state): State<FeatureState>) -> Result<Response, AppError> {
    let task_id = record_tasks::create(&state.db, TaskType::IndexUsage, None)
        .await
        .map_err(AppError::from)?;

    state
        .queue
        .push_usage(IndexUsageTask { task_id })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "taskId": task_id })),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tasks_routes_build() {
        let _router = tasks_routes();
    }
}
