//! Prerender handler
//!
//! Consumes [`PrerenderPdfTask`]s: produces one single-page PDF per page
//! image of a record into the record's pdf folder. Skips records without
//! images and records whose PDF count already matches, unless forced.

use apalis::prelude::*;
use thiserror::Error;

use dlp_common::types::TaskState;

use crate::db::record_tasks;
use crate::db::DbError;

use super::dataset::{Dataset, DatasetError};
use super::messages::PrerenderPdfTask;
use super::renderer::{self, RenderError};
use super::{abort, fail, WorkerContext};

#[derive(Debug, Error)]
enum PrerenderError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Process one prerender task
pub async fn process(task: PrerenderPdfTask, ctx: Data<WorkerContext>) -> Result<(), Error> {
    tracing::trace!(
        pi = %task.pi,
        config = task.config_variant.as_deref().unwrap_or("default"),
        force = task.force,
        "starting page prerender"
    );

    record_tasks::set_state(&ctx.db, task.task_id, TaskState::Running, None)
        .await
        .map_err(fail)?;

    match run(&task, &ctx).await {
        Ok(summary) => {
            record_tasks::set_state(&ctx.db, task.task_id, TaskState::Done, Some(&summary))
                .await
                .map_err(fail)?;
            Ok(())
        },
        Err(e) => {
            let message = e.to_string();
            if let Err(db_err) =
                record_tasks::set_state(&ctx.db, task.task_id, TaskState::Failed, Some(&message))
                    .await
            {
                tracing::error!("Error updating prerender task state: {db_err}");
            }
            Err(abort(e))
        },
    }
}

async fn run(task: &PrerenderPdfTask, ctx: &WorkerContext) -> Result<String, PrerenderError> {
    let dataset = Dataset::resolve(&ctx.config.downloads.data_dir, &task.pi)?;
    let images = dataset.page_images()?;

    if images.is_empty() {
        tracing::trace!(pi = %task.pi, "no page images, abandoning task");
        return Ok("no page images, nothing to do".to_string());
    }

    let pdfs = dataset.page_pdfs()?;
    if images.len() == pdfs.len() && !task.force {
        tracing::trace!(pi = %task.pi, "page PDFs already exist, abandoning task");
        return Ok("page PDFs already present".to_string());
    }

    let pdf_dir = dataset.pdf_dir.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        std::fs::create_dir_all(&pdf_dir)?;
        for image in &images {
            let out = pdf_dir
                .join(image.file_stem().unwrap_or_default())
                .with_extension("pdf");
            renderer::render_page_pdf(image, &out)?;
        }
        Ok::<usize, PrerenderError>(images.len())
    })
    .await
    .map_err(std::io::Error::other)??;

    Ok(format!("rendered {rendered} page PDFs"))
}
