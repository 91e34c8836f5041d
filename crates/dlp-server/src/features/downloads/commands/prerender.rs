//! Prerender command
//!
//! Enqueues a task that produces one single-page PDF per page image of a
//! record, so page downloads are served from disk instead of rendered on
//! demand.

use mediator::Request;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dlp_common::types::TaskType;

use crate::db::{record_tasks, DbError};
use crate::features::shared::validation::{validate_pi, ValidationError};
use crate::features::FeatureState;
use crate::tasks::messages::PrerenderPdfTask;
use crate::tasks::QueueError;

/// Command to prerender per-page PDFs for one record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerenderCommand {
    pub pi: String,
    /// Renderer configuration variant passed through to the render step
    #[serde(default)]
    pub config: Option<String>,
    /// Re-render pages whose PDFs already exist
    #[serde(default)]
    pub force: bool,
}

/// Error type for the prerender command
#[derive(Debug, thiserror::Error)]
pub enum PrerenderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error(transparent)]
    Queue(#[from] QueueError),
}

impl Request<Result<Uuid, PrerenderError>> for PrerenderCommand {}

#[tracing::instrument(skip(state), fields(pi = %command.pi))]
pub async fn handle(
    state: &FeatureState,
    command: PrerenderCommand,
) -> Result<Uuid, PrerenderError> {
    validate_pi(&command.pi)?;

    let task_id = record_tasks::create(&state.db, TaskType::PrerenderPdf, Some(&command.pi)).await?;

    state
        .queue
        .push_prerender(PrerenderPdfTask {
            task_id,
            pi: command.pi,
            config_variant: command.config,
            force: command.force,
        })
        .await?;

    Ok(task_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_defaults_to_false() {
        let command: PrerenderCommand =
            serde_json::from_value(serde_json::json!({"pi": "PPN1"})).unwrap();
        assert!(!command.force);
        assert!(command.config.is_none());
    }
}
