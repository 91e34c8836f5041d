//! Common types used across DLP
//!
//! Wire-level types shared between the server and the CLI: download-job and
//! record-task states plus the JSON views the REST API returns for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a download job.
///
/// `Initialized -> Waiting -> (Ready | Error)`; `Waiting` may re-enter
/// itself on retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Initialized,
    Waiting,
    Ready,
    Error,
}

impl JobStatus {
    /// True once the job has reached a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Ready | JobStatus::Error)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Initialized => write!(f, "INITIALIZED"),
            JobStatus::Waiting => write!(f, "WAITING"),
            JobStatus::Ready => write!(f, "READY"),
            JobStatus::Error => write!(f, "ERROR"),
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INITIALIZED" => Ok(JobStatus::Initialized),
            "WAITING" => Ok(JobStatus::Waiting),
            "READY" => Ok(JobStatus::Ready),
            "ERROR" => Ok(JobStatus::Error),
            other => Err(format!("unknown job status: {other}")),
        }
    }
}

/// Kind of background task tracked in the task table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    DeleteRecord,
    PrerenderPdf,
    IndexUsage,
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskType::DeleteRecord => write!(f, "DELETE_RECORD"),
            TaskType::PrerenderPdf => write!(f, "PRERENDER_PDF"),
            TaskType::IndexUsage => write!(f, "INDEX_USAGE"),
        }
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DELETE_RECORD" => Ok(TaskType::DeleteRecord),
            "PRERENDER_PDF" => Ok(TaskType::PrerenderPdf),
            "INDEX_USAGE" => Ok(TaskType::IndexUsage),
            other => Err(format!("unknown task type: {other}")),
        }
    }
}

/// Lifecycle state of a record task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    Queued,
    Running,
    Done,
    Failed,
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskState::Queued => write!(f, "QUEUED"),
            TaskState::Running => write!(f, "RUNNING"),
            TaskState::Done => write!(f, "DONE"),
            TaskState::Failed => write!(f, "FAILED"),
        }
    }
}

impl std::str::FromStr for TaskState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QUEUED" => Ok(TaskState::Queued),
            "RUNNING" => Ok(TaskState::Running),
            "DONE" => Ok(TaskState::Done),
            "FAILED" => Ok(TaskState::Failed),
            other => Err(format!("unknown task state: {other}")),
        }
    }
}

/// JSON view of a download job as returned by the REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadJobView {
    pub identifier: String,
    pub kind: String,
    pub pi: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_id: Option<String>,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_requested: DateTime<Utc>,
    /// Position in the render queue (1-based), 0 when ready, -1 on error.
    /// Omitted in list responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_position: Option<i64>,
}

/// JSON view of a record task as returned by the REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordTaskView {
    pub id: Uuid,
    pub task_type: TaskType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pi: Option<String>,
    pub status: TaskState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn job_status_round_trips_through_strings() {
        for status in [
            JobStatus::Initialized,
            JobStatus::Waiting,
            JobStatus::Ready,
            JobStatus::Error,
        ] {
            assert_eq!(status.to_string().parse::<JobStatus>().unwrap(), status);
        }
        assert!("BOGUS".parse::<JobStatus>().is_err());
    }

    #[test]
    fn job_status_terminal_states() {
        assert!(!JobStatus::Initialized.is_terminal());
        assert!(!JobStatus::Waiting.is_terminal());
        assert!(JobStatus::Ready.is_terminal());
        assert!(JobStatus::Error.is_terminal());
    }

    #[test]
    fn task_type_round_trips_through_strings() {
        for t in [TaskType::DeleteRecord, TaskType::PrerenderPdf, TaskType::IndexUsage] {
            assert_eq!(t.to_string().parse::<TaskType>().unwrap(), t);
        }
    }

    #[test]
    fn job_view_serializes_camel_case() {
        let view = DownloadJobView {
            identifier: "abc".to_string(),
            kind: "pdf".to_string(),
            pi: "PPN123".to_string(),
            log_id: Some("LOG_0001".to_string()),
            status: JobStatus::Waiting,
            message: None,
            last_requested: Utc::now(),
            queue_position: Some(2),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "WAITING");
        assert_eq!(json["logId"], "LOG_0001");
        assert_eq!(json["queuePosition"], 2);
        assert!(json.get("message").is_none());
    }
}
