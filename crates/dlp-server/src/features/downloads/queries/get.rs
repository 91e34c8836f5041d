//! Get download job query
//!
//! Status poll for a single download job by its identifier.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use dlp_common::types::DownloadJobView;

use crate::db::download_jobs;
use crate::db::DbError;

use super::super::types::DownloadJob;

/// Query to get a download job by identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDownloadJobQuery {
    pub identifier: String,
}

/// Error type for the get query
#[derive(Debug, thiserror::Error)]
pub enum GetDownloadJobError {
    #[error("Download job not found")]
    NotFound,
    #[error(transparent)]
    Database(#[from] DbError),
}

impl Request<Result<DownloadJobView, GetDownloadJobError>> for GetDownloadJobQuery {}

pub async fn handle(
    pool: &PgPool,
    query: GetDownloadJobQuery,
) -> Result<DownloadJobView, GetDownloadJobError> {
    let row = download_jobs::get_by_identifier(pool, &query.identifier)
        .await?
        .ok_or(GetDownloadJobError::NotFound)?;

    let position = download_jobs::queue_position(pool, &row).await?;
    let job = DownloadJob::from_row(row)?;

    Ok(job.into_view(Some(position)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_carries_identifier() {
        let query = GetDownloadJobQuery {
            identifier: "07319d09".to_string(),
        };
        assert_eq!(query.identifier, "07319d09");
    }
}
