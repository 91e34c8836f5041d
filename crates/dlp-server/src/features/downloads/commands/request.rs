//! Request-download command
//!
//! Idempotent request for a PDF derivative: creates or refreshes the job row
//! keyed by the deterministic identifier and enqueues a build task when the
//! derivative does not already exist.

use mediator::Request;
use serde::{Deserialize, Serialize};

use dlp_common::types::DownloadJobView;

use crate::db::download_jobs::{self, NewDownloadJob};
use crate::db::DbError;
use crate::features::shared::validation::{
    normalize_log_id, validate_email, validate_log_id, validate_pi, ValidationError,
};
use crate::features::FeatureState;
use crate::tasks::messages::PdfBuildTask;
use crate::tasks::QueueError;

use super::super::types::{DownloadJob, DownloadKind};

/// Command to request a PDF derivative for a record or one division
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDownloadCommand {
    pub pi: String,
    #[serde(default)]
    pub log_id: Option<String>,
    /// Observer email address notified when the derivative is ready
    #[serde(default)]
    pub email: Option<String>,
}

/// Error type for the request-download command
#[derive(Debug, thiserror::Error)]
pub enum RequestDownloadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl Request<Result<DownloadJobView, RequestDownloadError>> for RequestDownloadCommand {}

#[tracing::instrument(skip(state), fields(pi = %command.pi))]
pub async fn handle(
    state: &FeatureState,
    command: RequestDownloadCommand,
) -> Result<DownloadJobView, RequestDownloadError> {
    validate_pi(&command.pi)?;
    let log_id = normalize_log_id(command.log_id.as_deref());
    if let Some(ref log_id) = log_id {
        validate_log_id(log_id)?;
    }
    if let Some(ref email) = command.email {
        validate_email(email)?;
    }

    let identifier = DownloadJob::job_identifier(&command.pi, log_id.as_deref());

    let (row, created) = download_jobs::upsert_request(
        &state.db,
        &NewDownloadJob {
            identifier: &identifier,
            kind: DownloadKind::Pdf.as_str(),
            pi: &command.pi,
            log_id: log_id.as_deref(),
            ttl_ms: state.config.downloads.job_ttl_ms,
        },
    )
    .await?;

    if let Some(ref email) = command.email {
        download_jobs::add_observer(&state.db, &identifier, email).await?;
    }

    let position = download_jobs::queue_position(&state.db, &row).await?;
    let job = DownloadJob::from_row(row)?;
    let file_exists = job.file_path(&state.config.downloads.download_dir).is_file();

    // The identifier is the idempotency key: a task is enqueued only for a
    // fresh row or one whose previous outcome is unusable. Requests landing
    // on a job that is already queued or rendering are satisfied by the row
    // refresh alone.
    if created || job.requires_rerender(file_exists) {
        state
            .queue
            .push_pdf(PdfBuildTask::new(&command.pi, log_id.as_deref()))
            .await?;
        tracing::debug!(identifier = %identifier, "pdf build task enqueued");
    } else {
        tracing::debug!(identifier = %identifier, status = %job.status, "job already known, no task enqueued");
    }

    Ok(job.into_view(Some(position)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_deserializes_camel_case() {
        let json = serde_json::json!({
            "pi": "PPN123456789",
            "logId": "LOG_0000",
            "email": "me@he.re"
        });
        let command: RequestDownloadCommand = serde_json::from_value(json).unwrap();
        assert_eq!(command.pi, "PPN123456789");
        assert_eq!(command.log_id.as_deref(), Some("LOG_0000"));
        assert_eq!(command.email.as_deref(), Some("me@he.re"));
    }

    #[test]
    fn command_fields_default_to_none() {
        let command: RequestDownloadCommand =
            serde_json::from_value(serde_json::json!({"pi": "PPN1"})).unwrap();
        assert!(command.log_id.is_none());
        assert!(command.email.is_none());
    }
}
