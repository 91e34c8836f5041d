//! Delete record command
//!
//! Record deletion is inherently asynchronous: the endpoint enqueues a
//! deletion task and returns its id for polling instead of blocking the
//! request thread on the index.

use mediator::Request;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dlp_common::types::TaskType;

use crate::db::{record_tasks, DbError};
use crate::features::shared::validation::{validate_pi, ValidationError};
use crate::features::FeatureState;
use crate::tasks::messages::DeleteRecordTask;
use crate::tasks::QueueError;
use crate::index::IndexError;

/// Command to delete a record from the search index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecordCommand {
    pub pi: String,
    /// Leave a trace document in the index marking the deletion
    #[serde(default)]
    pub create_trace_document: bool,
}

/// Error type for the delete-record command
#[derive(Debug, thiserror::Error)]
pub enum DeleteRecordError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Record has child volumes and cannot be deleted")]
    VolumesPresent,
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl Request<Result<Uuid, DeleteRecordError>> for DeleteRecordCommand {}

#[tracing::instrument(skip(state), fields(pi = %command.pi))]
pub async fn handle(
    state: &FeatureState,
    command: DeleteRecordCommand,
) -> Result<Uuid, DeleteRecordError> {
    validate_pi(&command.pi)?;

    // Anchor records with attached volumes must have their volumes removed
    // first, otherwise the volumes become unreachable orphans.
    let volumes = state
        .index
        .hit_count(&format!("PI_PARENT:\"{}\"", command.pi))
        .await?;
    if volumes > 0 {
        return Err(DeleteRecordError::VolumesPresent);
    }

    let task_id = record_tasks::create(&state.db, TaskType::DeleteRecord, Some(&command.pi)).await?;

    state
        .queue
        .push_delete(DeleteRecordTask {
            task_id,
            pi: command.pi,
            create_trace_document: command.create_trace_document,
        })
        .await?;

    Ok(task_id)
}
