//! Usage indexing handler
//!
//! Consumes [`IndexUsageTask`]s: pushes accumulated daily usage rows into
//! the search index in batches and marks them indexed.

use apalis::prelude::*;
use serde_json::json;
use thiserror::Error;

use dlp_common::types::TaskState;

use crate::db::{record_tasks, usage, DbError};
use crate::index::IndexError;

use super::messages::IndexUsageTask;
use super::{abort, fail, WorkerContext};

/// Rows pushed to the index per update request.
const BATCH_SIZE: i64 = 500;

#[derive(Debug, Error)]
enum UsageIndexError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Process one usage-indexing task
pub async fn process(task: IndexUsageTask, ctx: Data<WorkerContext>) -> Result<(), Error> {
    record_tasks::set_state(&ctx.db, task.task_id, TaskState::Running, None)
        .await
        .map_err(fail)?;

    match run(&ctx).await {
        Ok(indexed) => {
            let summary = format!("indexed {indexed} usage rows");
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
                tracing::error!("Error updating usage indexing task state: {db_err}");
            }
            Err(abort(e))
        },
    }
}

async fn run(ctx: &WorkerContext) -> Result<usize, UsageIndexError> {
    let mut indexed = 0usize;

    loop {
        let rows = usage::fetch_unindexed(&ctx.db, BATCH_SIZE).await?;
        if rows.is_empty() {
            break;
        }

        let docs: Vec<_> = rows
            .iter()
            .map(|row| {
                json!({
                    "id": format!("usage_{}_{}", row.record_date, row.pi),
                    "DOCTYPE": "USAGE_STATISTICS",
                    "PI": row.pi,
                    "STATISTICS_DATE": row.record_date.to_string(),
                    "REQUEST_COUNT": row.requests,
                })
            })
            .collect();

        ctx.index.add_documents(&docs).await?;

        for row in &rows {
            usage::mark_indexed(&ctx.db, row.record_date, &row.pi).await?;
        }

        indexed += rows.len();
        if (rows.len() as i64) < BATCH_SIZE {
            break;
        }
    }

    tracing::debug!(indexed, "usage statistics pushed to index");

    Ok(indexed)
}
