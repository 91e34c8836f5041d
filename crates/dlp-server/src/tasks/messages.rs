//! Task payloads for the apalis queue
//!
//! Each payload carries the handful of parameters its handler needs; the
//! handlers pull everything else (job rows, data folders, configuration)
//! from the worker context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Build the PDF derivative for a record or one logical division
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfBuildTask {
    /// Persistent identifier of the record
    pub pi: String,
    /// Logical division id; `None` renders the whole record
    pub log_id: Option<String>,
    /// Timestamp when the task was created
    pub created_at: DateTime<Utc>,
}

impl PdfBuildTask {
    /// Create a new build task
    pub fn new(pi: &str, log_id: Option<&str>) -> Self {
        Self {
            pi: pi.to_string(),
            log_id: log_id.map(ToString::to_string),
            created_at: Utc::now(),
        }
    }
}

/// Prerender one single-page PDF per page image of a record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrerenderPdfTask {
    /// Record task row tracking this work
    pub task_id: Uuid,
    pub pi: String,
    /// Renderer configuration variant
    pub config_variant: Option<String>,
    /// Re-render pages whose PDFs already exist
    pub force: bool,
}

/// Push accumulated usage statistics into the search index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexUsageTask {
    /// Record task row tracking this work
    pub task_id: Uuid,
}

/// Delete a record from the search index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRecordTask {
    /// Record task row tracking this work
    pub task_id: Uuid,
    pub pi: String,
    /// Leave a trace document in the index marking the deletion
    pub create_trace_document: bool,
}

/// Cron tick for the expired-job sweep
#[derive(Debug, Clone)]
pub struct SweepTick(pub DateTime<Utc>);

impl From<DateTime<Utc>> for SweepTick {
    fn from(timestamp: DateTime<Utc>) -> Self {
        SweepTick(timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_build_task_round_trips_through_json() {
        let task = PdfBuildTask::new("PPN123456789", Some("LOG_0000"));
        let json = serde_json::to_string(&task).unwrap();
        let back: PdfBuildTask = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pi, "PPN123456789");
        assert_eq!(back.log_id.as_deref(), Some("LOG_0000"));
    }

    #[test]
    fn whole_record_task_has_no_division() {
        let task = PdfBuildTask::new("PI_3", None);
        assert!(task.log_id.is_none());
    }
}
