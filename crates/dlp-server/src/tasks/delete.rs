//! Record deletion handler
//!
//! Consumes [`DeleteRecordTask`]s: removes every index document of a record
//! and optionally leaves a trace document marking the deletion.

use apalis::prelude::*;
use chrono::Utc;
use serde_json::json;

use dlp_common::types::TaskState;

use crate::db::record_tasks;
use crate::index::IndexError;

use super::messages::DeleteRecordTask;
use super::{abort, fail, WorkerContext};

/// Process one record deletion task
pub async fn process(task: DeleteRecordTask, ctx: Data<WorkerContext>) -> Result<(), Error> {
    record_tasks::set_state(&ctx.db, task.task_id, TaskState::Running, None)
        .await
        .map_err(fail)?;

    match run(&task, &ctx).await {
        Ok(()) => {
            record_tasks::set_state(
                &ctx.db,
                task.task_id,
                TaskState::Done,
                Some("record removed from index"),
            )
            .await
            .map_err(fail)?;
            tracing::info!(pi = %task.pi, "record deleted from index");
            Ok(())
        },
        Err(e) => {
            let message = e.to_string();
            if let Err(db_err) =
                record_tasks::set_state(&ctx.db, task.task_id, TaskState::Failed, Some(&message))
                    .await
            {
                tracing::error!("Error updating delete task state: {db_err}");
            }
            Err(abort(e))
        },
    }
}

async fn run(task: &DeleteRecordTask, ctx: &WorkerContext) -> Result<(), IndexError> {
    ctx.index.delete_record(&task.pi).await?;

    if task.create_trace_document {
        let trace = json!({
            "id": format!("DELETED:{}", task.pi),
            "PI": task.pi,
            "DOCTYPE": "DELETED_RECORD",
            "DATEDELETED": Utc::now().timestamp_millis(),
        });
        ctx.index.add_documents(&[trace]).await?;
    }

    Ok(())
}
