//! Download job domain types

use chrono::{DateTime, Duration, Utc};
use dlp_common::hash::download_job_id;
use dlp_common::types::{DownloadJobView, JobStatus};
use std::path::{Path, PathBuf};

use crate::db::download_jobs::DownloadJobRow;
use crate::db::DbResult;

/// Kind of derivative a download job produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadKind {
    Pdf,
}

impl DownloadKind {
    /// Storage key, also the subdirectory under the download folder
    pub fn as_str(self) -> &'static str {
        match self {
            DownloadKind::Pdf => "pdf",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            DownloadKind::Pdf => ".pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            DownloadKind::Pdf => "application/pdf",
        }
    }
}

/// A requested derivative of a record (or one logical division), tracked
/// with a status and a time-to-live
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub identifier: String,
    pub kind: DownloadKind,
    pub pi: String,
    pub log_id: Option<String>,
    pub status: JobStatus,
    pub message: Option<String>,
    pub ttl_ms: i64,
    pub last_requested: DateTime<Utc>,
    pub observers: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl DownloadJob {
    /// Deterministic identifier for the `(pi, log_id)` creation criteria.
    ///
    /// Repeated requests for the same derivative map to the same identifier,
    /// which keys the job row and so makes creation idempotent.
    pub fn job_identifier(pi: &str, log_id: Option<&str>) -> String {
        download_job_id(&[Some(pi), log_id])
    }

    /// Rehydrate a job from its database row
    pub fn from_row(row: DownloadJobRow) -> DbResult<Self> {
        let status = row.job_status()?;
        Ok(Self {
            identifier: row.identifier,
            // only one kind exists; unknown kinds would have been rejected
            // at the REST boundary
            kind: DownloadKind::Pdf,
            pi: row.pi,
            log_id: row.log_id,
            status,
            message: row.message,
            ttl_ms: row.ttl_ms,
            last_requested: row.last_requested,
            observers: row.observers,
            created_at: row.created_at,
        })
    }

    /// A job is expired once its TTL has elapsed since the last request
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.last_requested > Duration::milliseconds(self.ttl_ms)
    }

    /// Whether a render attempt must reset this job to `WAITING` first: the
    /// previous attempt failed, or the job claims `READY` but its file is
    /// gone from disk
    pub fn requires_rerender(&self, file_exists: bool) -> bool {
        self.status == JobStatus::Error || (self.status == JobStatus::Ready && !file_exists)
    }

    /// File name of the finished derivative
    pub fn file_name(&self) -> String {
        format!("{}{}", self.identifier, self.kind.file_extension())
    }

    /// Full path of the finished derivative under the download folder
    pub fn file_path(&self, download_dir: &Path) -> PathBuf {
        download_dir.join(self.kind.as_str()).join(self.file_name())
    }

    /// JSON view for the REST API
    pub fn into_view(self, queue_position: Option<i64>) -> DownloadJobView {
        DownloadJobView {
            identifier: self.identifier,
            kind: self.kind.as_str().to_string(),
            pi: self.pi,
            log_id: self.log_id,
            status: self.status,
            message: self.message,
            last_requested: self.last_requested,
            queue_position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(status: JobStatus, ttl_ms: i64) -> DownloadJob {
        DownloadJob {
            identifier: DownloadJob::job_identifier("PPN123456789", Some("LOG_0000")),
            kind: DownloadKind::Pdf,
            pi: "PPN123456789".to_string(),
            log_id: Some("LOG_0000".to_string()),
            status,
            message: None,
            ttl_ms,
            last_requested: Utc::now(),
            observers: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn identifier_matches_known_fixture() {
        assert_eq!(
            DownloadJob::job_identifier("PPN123456789", Some("LOG_0000")),
            "07319d093ea0e44a618cdf3accb9576009025f7ea7ed3b6765192f1ddca6a801"
        );
    }

    #[test]
    fn identifier_is_stable_for_whole_record() {
        let a = DownloadJob::job_identifier("PI_3", None);
        let b = DownloadJob::job_identifier("PI_3", None);
        assert_eq!(a, b);
    }

    #[test]
    fn expiry_follows_ttl() {
        let expired = job(JobStatus::Ready, 0);
        let fresh = job(JobStatus::Ready, 30_000);
        let later = Utc::now() + Duration::milliseconds(5);
        assert!(expired.is_expired(later));
        assert!(!fresh.is_expired(later));
    }

    #[test]
    fn error_jobs_require_rerender() {
        assert!(job(JobStatus::Error, 1000).requires_rerender(true));
        assert!(job(JobStatus::Error, 1000).requires_rerender(false));
    }

    #[test]
    fn ready_jobs_require_rerender_only_without_file() {
        assert!(!job(JobStatus::Ready, 1000).requires_rerender(true));
        assert!(job(JobStatus::Ready, 1000).requires_rerender(false));
    }

    #[test]
    fn queued_jobs_do_not_require_rerender() {
        assert!(!job(JobStatus::Initialized, 1000).requires_rerender(false));
        assert!(!job(JobStatus::Waiting, 1000).requires_rerender(false));
    }

    #[test]
    fn file_path_is_kind_scoped() {
        let j = job(JobStatus::Ready, 1000);
        let path = j.file_path(Path::new("/var/downloads"));
        assert_eq!(
            path,
            Path::new("/var/downloads/pdf")
                .join("07319d093ea0e44a618cdf3accb9576009025f7ea7ed3b6765192f1ddca6a801.pdf")
        );
    }
}
