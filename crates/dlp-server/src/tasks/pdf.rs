//! PDF build handler
//!
//! Consumes [`PdfBuildTask`]s: loads the job row by its recomputed
//! identifier, renders the record (or one division) to the download folder,
//! and moves the job through the status machine
//! `INITIALIZED -> WAITING -> (READY | ERROR)`.

use apalis::prelude::*;
use std::path::PathBuf;
use thiserror::Error;

use dlp_common::types::JobStatus;

use crate::db::download_jobs;
use crate::db::DbError;
use crate::features::downloads::types::DownloadJob;

use super::dataset::{Dataset, DatasetError};
use super::messages::PdfBuildTask;
use super::renderer::{self, RenderError};
use super::{abort, fail, WorkerContext};

/// Render failures are retried this many times before the job goes to ERROR.
pub const MAX_RETRIES: usize = 2;

/// User-facing message stored on terminally failed jobs.
const ERROR_MESSAGE: &str = "Error creating PDF. Please contact support if the problem persists";

#[derive(Debug, Error)]
enum PdfBuildError {
    #[error("Download job '{0}' has no database row")]
    JobMissing(String),

    #[error("Renderer produced no output file at {0}")]
    OutputMissing(PathBuf),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Process one PDF build task
pub async fn process(
    task: PdfBuildTask,
    ctx: Data<WorkerContext>,
    attempt: Attempt,
) -> Result<(), Error> {
    let identifier = DownloadJob::job_identifier(&task.pi, task.log_id.as_deref());

    match build(&task, &identifier, &ctx).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::warn!(
                identifier = %identifier,
                attempt = attempt.current(),
                "pdf build failed: {e}"
            );

            if attempt.current() > MAX_RETRIES {
                if let Err(db_err) = download_jobs::update_status(
                    &ctx.db,
                    &identifier,
                    JobStatus::Error,
                    Some(ERROR_MESSAGE),
                )
                .await
                {
                    tracing::error!(
                        "Error updating pdf download job in database after it reached an error status: {db_err}"
                    );
                }
                Err(abort(e))
            } else {
                Err(fail(e))
            }
        },
    }
}

async fn build(
    task: &PdfBuildTask,
    identifier: &str,
    ctx: &WorkerContext,
) -> Result<(), PdfBuildError> {
    let row = download_jobs::get_by_identifier(&ctx.db, identifier)
        .await?
        .ok_or_else(|| PdfBuildError::JobMissing(identifier.to_string()))?;
    let job = DownloadJob::from_row(row)?;

    let out = job.file_path(&ctx.config.downloads.download_dir);
    let file_exists = out.is_file();

    if job.status == JobStatus::Ready && file_exists {
        tracing::debug!(identifier = %identifier, "derivative already on disk, nothing to do");
        return Ok(());
    }

    // A failed or file-less job re-enters the queue state before the new
    // attempt; a fresh job enters it for the first time.
    if job.requires_rerender(file_exists) || job.status == JobStatus::Initialized {
        download_jobs::update_status(&ctx.db, identifier, JobStatus::Waiting, None).await?;
    }

    let dataset = Dataset::resolve(&ctx.config.downloads.data_dir, &task.pi)?;
    let images = match task.log_id.as_deref() {
        Some(div) => dataset.division_images(div)?,
        None => dataset.page_images()?,
    };

    let render_out = out.clone();
    tokio::task::spawn_blocking(move || renderer::render_pdf(&images, &render_out))
        .await
        .map_err(std::io::Error::other)??;

    // READY only once the output is confirmed on disk
    if !out.is_file() {
        return Err(PdfBuildError::OutputMissing(out));
    }

    download_jobs::update_status(&ctx.db, identifier, JobStatus::Ready, None).await?;

    for observer in &job.observers {
        // mail delivery is handled outside this service; the completion is
        // recorded per observer
        tracing::info!(
            observer = %observer,
            identifier = %identifier,
            pi = %task.pi,
            "download ready, notifying observer"
        );
    }

    tracing::info!(identifier = %identifier, pi = %task.pi, "pdf derivative ready");

    Ok(())
}
