//! List download jobs query

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use dlp_common::types::{DownloadJobView, JobStatus};

use crate::db::download_jobs;
use crate::db::DbError;
use crate::features::shared::pagination::{Paginated, PaginationParams};

use super::super::types::DownloadJob;

/// Query to list download jobs, newest first
///
/// Pagination fields are inlined because the urlencoded deserializer cannot
/// handle numbers inside `#[serde(flatten)]` structs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListDownloadJobsQuery {
    /// Filter by status (INITIALIZED, WAITING, READY, ERROR)
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
}

impl ListDownloadJobsQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Error type for the list query
#[derive(Debug, thiserror::Error)]
pub enum ListDownloadJobsError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Database(#[from] DbError),
}

impl Request<Result<Paginated<DownloadJobView>, ListDownloadJobsError>> for ListDownloadJobsQuery {}

pub async fn handle(
    pool: &PgPool,
    query: ListDownloadJobsQuery,
) -> Result<Paginated<DownloadJobView>, ListDownloadJobsError> {
    let pagination = query.pagination();
    pagination
        .validate()
        .map_err(|e| ListDownloadJobsError::Validation(e.to_string()))?;

    let status = query
        .status
        .as_deref()
        .map(str::parse::<JobStatus>)
        .transpose()
        .map_err(ListDownloadJobsError::Validation)?;

    let rows = download_jobs::list(pool, status, pagination.per_page(), pagination.offset()).await?;
    let total = download_jobs::count(pool, status).await?;

    let items = rows
        .into_iter()
        .map(|row| DownloadJob::from_row(row).map(|job| job.into_view(None)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Paginated::from_items(items, &pagination, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_is_optional() {
        let query: ListDownloadJobsQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(query.status.is_none());
        assert_eq!(query.pagination().page(), 1);
    }

    #[test]
    fn status_filter_deserializes() {
        let query: ListDownloadJobsQuery =
            serde_json::from_value(serde_json::json!({"status": "WAITING", "page": 2})).unwrap();
        assert_eq!(query.status.as_deref(), Some("WAITING"));
        assert_eq!(query.pagination().page(), 2);
    }
}
