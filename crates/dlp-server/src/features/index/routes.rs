//! Index routes

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::error::AppError;
use crate::features::FeatureState;

use super::commands::{
    delete_record::handle as handle_delete, DeleteRecordCommand, DeleteRecordError,
};
use super::queries::{
    query_records::handle as handle_query,
    statistics::handle as handle_statistics,
    RecordsQueryError, RecordsQueryRequest, StatisticsError, StatisticsQuery,
};

/// Create index routes
pub fn index_routes() -> Router<FeatureState> {
    Router::new()
        .route("/query", post(query_records))
        .route("/statistics", get(statistics))
        .route("/records/delete", post(delete_record))
}

/// Post a query directly to the search index
///
/// POST /index/query
async fn query_records(
    State(state): State<FeatureState>,
    Json(request): Json<RecordsQueryRequest>,
) -> Result<Response, AppError> {
    let docs = handle_query(&state.index, request).await.map_err(|e| match e {
        RecordsQueryError::Validation(e) => AppError::Validation(e.to_string()),
        RecordsQueryError::Index(e) => e.into(),
    })?;

    Ok((StatusCode::OK, Json(docs)).into_response())
}

/// Statistics about indexed records
///
/// GET /index/statistics?query=...
async fn statistics(
    State(state): State<FeatureState>,
    Query(query): Query<StatisticsQuery>,
) -> Result<Response, AppError> {
    let response = handle_statistics(&state.index, query)
        .await
        .map_err(|e| match e {
            StatisticsError::Validation(e) => AppError::Validation(e.to_string()),
            StatisticsError::Index(e) => e.into(),
        })?;

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Enqueue deletion of a record from the index
///
/// POST /index/records/delete
async fn delete_record(
    State(state): State<FeatureState>,
    Json(command): Json<DeleteRecordCommand>,
) -> Result<Response, AppError> {
    let task_id = handle_delete(&state, command).await.map_err(|e| match e {
        DeleteRecordError::Validation(e) => AppError::Validation(e.to_string()),
        DeleteRecordError::VolumesPresent => AppError::Forbidden(e.to_string()),
        DeleteRecordError::Index(e) => e.into(),
        DeleteRecordError::Database(e) => e.into(),
        DeleteRecordError::Queue(e) => AppError::Internal(e.to_string()),
    })?;

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
    async fn test_index_routes_build() {
        let _router = index_routes();
    }
}
