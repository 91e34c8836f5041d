//! Download routes
//!
//! Requesting a derivative is idempotent and returns 202 with the job view;
//! clients poll the job endpoint and fetch the file once the job is READY.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use dlp_common::types::JobStatus;

use crate::db::{download_jobs, usage};
use crate::error::AppError;
use crate::features::FeatureState;

use super::commands::{
    prerender::handle as handle_prerender,
    request::handle as handle_request,
    PrerenderCommand, PrerenderError, RequestDownloadCommand, RequestDownloadError,
};
use super::queries::{
    get::handle as handle_get,
    list::handle as handle_list,
    GetDownloadJobError, GetDownloadJobQuery, ListDownloadJobsError, ListDownloadJobsQuery,
};
use super::types::DownloadJob;

/// Create download routes
pub fn downloads_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_jobs))
        .route("/pdf", post(request_pdf))
        .route("/pdf/prerender", post(prerender_pdf))
        .route("/pdf/:identifier", get(get_job))
        .route("/pdf/:identifier/file", get(get_file))
}

/// Request a PDF derivative
///
/// POST /downloads/pdf
async fn request_pdf(
    State(state): State<FeatureState>,
    Json(command): Json<RequestDownloadCommand>,
) -> Result<Response, AppError> {
    let view = handle_request(&state, command).await.map_err(|e| match e {
        RequestDownloadError::Validation(e) => AppError::Validation(e.to_string()),
        RequestDownloadError::Database(e) => e.into(),
        RequestDownloadError::Queue(e) => AppError::Internal(e.to_string()),
    })?;

    Ok((StatusCode::ACCEPTED, Json(view)).into_response())
}

/// Enqueue per-page prerendering for a record
///
/// POST /downloads/pdf/prerender
async fn prerender_pdf(
    State(state): State<FeatureState>,
    Json(command): Json<PrerenderCommand>,
) -> Result<Response, AppError> {
    let task_id = handle_prerender(&state, command).await.map_err(|e| match e {
        PrerenderError::Validation(e) => AppError::Validation(e.to_string()),
        PrerenderError::Database(e) => e.into(),
        PrerenderError::Queue(e) => AppError::Internal(e.to_string()),
    })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "taskId": task_id })),
    )
        .into_response())
}

/// Poll a download job
///
/// GET /downloads/pdf/:identifier
async fn get_job(
    State(state): State<FeatureState>,
    Path(identifier): Path<String>,
) -> Result<Response, AppError> {
    let view = handle_get(&state.db, GetDownloadJobQuery { identifier })
        .await
        .map_err(|e| match e {
            GetDownloadJobError::NotFound => AppError::NotFound("Download job not found".to_string()),
            GetDownloadJobError::Database(e) => e.into(),
        })?;

    Ok((StatusCode::OK, Json(view)).into_response())
}

/// Fetch the finished derivative file
///
/// GET /downloads/pdf/:identifier/file
async fn get_file(
    State(state): State<FeatureState>,
    Path(identifier): Path<String>,
) -> Result<Response, AppError> {
    let row = download_jobs::get_by_identifier(&state.db, &identifier)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound("Download job not found".to_string()))?;

    let job = DownloadJob::from_row(row).map_err(AppError::from)?;
    if job.status != JobStatus::Ready {
        return Err(AppError::Conflict(format!(
            "Download job is not ready (status {})",
            job.status
        )));
    }

    let path = job.file_path(&state.config.downloads.download_dir);
    if !path.is_file() {
        return Err(AppError::Conflict(
            "Derivative file is missing, request the download again".to_string(),
        ));
    }

    let bytes = tokio::fs::read(&path).await?;

    if let Err(e) = usage::increment(&state.db, &job.pi).await {
        tracing::warn!(pi = %job.pi, "failed to count download: {e}");
    }

    let filename = match job.log_id {
        Some(ref log_id) => format!("{}_{}.pdf", job.pi, log_id),
        None => format!("{}.pdf", job.pi),
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, job.kind.mime_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// List download jobs
///
/// GET /downloads?status=WAITING&page=1&per_page=20
async fn list_jobs(
    State(state): State<FeatureState>,
    Query(query): Query<ListDownloadJobsQuery>,
) -> Result<Response, AppError> {
    let page = handle_list(&state.db, query).await.map_err(|e| match e {
        ListDownloadJobsError::Validation(msg) => AppError::Validation(msg),
        ListDownloadJobsError::Database(e) => e.into(),
    })?;

    Ok((StatusCode::OK, Json(page)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_downloads_routes_build() {
        let _router = downloads_routes();
    }
}
