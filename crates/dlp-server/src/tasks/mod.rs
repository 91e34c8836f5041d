//! Background tasks
//!
//! Producer handles and worker registration for the apalis queue. Each
//! handler performs one unit of work for one dequeued task; concurrency
//! control and at-most-one-concurrent-handler-per-task are the queue
//! backend's guarantee, so handlers hold no locks.

use apalis::prelude::*;
use apalis_cron::CronStream;
use apalis_postgres::PostgresStorage;
use sqlx::PgPool;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

pub mod context;
pub mod dataset;
pub mod delete;
pub mod messages;
pub mod pdf;
pub mod prerender;
pub mod renderer;
pub mod sweep;
pub mod usage;

pub use apalis_cron::Schedule;
pub use context::WorkerContext;

use self::messages::{DeleteRecordTask, IndexUsageTask, PdfBuildTask, PrerenderPdfTask};

/// Error pushing a task onto the queue
#[derive(Debug, Error)]
#[error("task queue error: {0}")]
pub struct QueueError(pub String);

/// Producer handles for every task type
#[derive(Clone)]
pub struct TaskQueue {
    pdf: PostgresStorage<PdfBuildTask>,
    prerender: PostgresStorage<PrerenderPdfTask>,
    usage: PostgresStorage<IndexUsageTask>,
    delete: PostgresStorage<DeleteRecordTask>,
}

impl TaskQueue {
    /// Create producer handles over the shared pool
    pub fn new(pool: &PgPool) -> Self {
        Self {
            pdf: PostgresStorage::new(pool),
            prerender: PostgresStorage::new(pool),
            usage: PostgresStorage::new(pool),
            delete: PostgresStorage::new(pool),
        }
    }

    /// Run the queue backend's schema setup
    pub async fn setup(pool: &PgPool) -> anyhow::Result<()> {
        PostgresStorage::setup(pool)
            .await
            .map_err(|e| anyhow::anyhow!("apalis schema setup failed: {e}"))?;
        Ok(())
    }

    pub async fn push_pdf(&self, task: PdfBuildTask) -> Result<(), QueueError> {
        self.pdf
            .clone()
            .push(task)
            .await
            .map(|_| ())
            .map_err(|e| QueueError(e.to_string()))
    }

    pub async fn push_prerender(&self, task: PrerenderPdfTask) -> Result<(), QueueError> {
        self.prerender
            .clone()
            .push(task)
            .await
            .map(|_| ())
            .map_err(|e| QueueError(e.to_string()))
    }

    pub async fn push_usage(&self, task: IndexUsageTask) -> Result<(), QueueError> {
        self.usage
            .clone()
            .push(task)
            .await
            .map(|_| ())
            .map_err(|e| QueueError(e.to_string()))
    }

    pub async fn push_delete(&self, task: DeleteRecordTask) -> Result<(), QueueError> {
        self.delete
            .clone()
            .push(task)
            .await
            .map(|_| ())
            .map_err(|e| QueueError(e.to_string()))
    }
}

/// Wrap a handler error for a retryable failure
pub(crate) fn fail(e: impl std::error::Error + Send + Sync + 'static) -> Error {
    let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(e);
    Error::Failed(std::sync::Arc::new(boxed))
}

/// Wrap a handler error for a terminal failure (no further retries)
pub(crate) fn abort(e: impl std::error::Error + Send + Sync + 'static) -> Error {
    let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(e);
    Error::Abort(std::sync::Arc::new(boxed))
}

/// Start the worker monitor: one worker per task type plus the cron-driven
/// expired-job sweep
pub fn start_workers(
    ctx: WorkerContext,
    queue: TaskQueue,
    sweep_schedule: Schedule,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Task workers started");

        let monitor = Monitor::new()
            .register({
                let ctx = ctx.clone();
                let storage = queue.pdf.clone();
                move |_index| {
                    WorkerBuilder::new("dlp-pdf-worker")
                        .data(ctx.clone())
                        .backend(storage.clone())
                        .build(pdf::process)
                }
            })
            .register({
                let ctx = ctx.clone();
                let storage = queue.prerender.clone();
                move |_index| {
                    WorkerBuilder::new("dlp-prerender-worker")
                        .data(ctx.clone())
                        .backend(storage.clone())
                        .build(prerender::process)
                }
            })
            .register({
                let ctx = ctx.clone();
                let storage = queue.usage.clone();
                move |_index| {
                    WorkerBuilder::new("dlp-usage-worker")
                        .data(ctx.clone())
                        .backend(storage.clone())
                        .build(usage::process)
                }
            })
            .register({
                let ctx = ctx.clone();
                let storage = queue.delete.clone();
                move |_index| {
                    WorkerBuilder::new("dlp-delete-worker")
                        .data(ctx.clone())
                        .backend(storage.clone())
                        .build(delete::process)
                }
            })
            .register({
                let ctx = ctx.clone();
                let schedule = sweep_schedule.clone();
                move |_index| {
                    WorkerBuilder::new("dlp-sweep-worker")
                        .data(ctx.clone())
                        .backend(CronStream::new(schedule.clone()))
                        .build(sweep::process)
                }
            });

        if let Err(e) = monitor.run().await {
            tracing::error!("Task worker error: {:?}", e);
        }

        info!("Task workers stopped");
    })
}
