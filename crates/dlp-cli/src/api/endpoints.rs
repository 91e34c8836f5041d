//! URL construction for the DLP server API

/// Health endpoint (unversioned)
pub fn health_url(base: &str) -> String {
    format!("{}/health", base.trim_end_matches('/'))
}

/// Index statistics endpoint
pub fn statistics_url(base: &str) -> String {
    format!("{}/api/v1/index/statistics", base.trim_end_matches('/'))
}

/// Index query endpoint
pub fn query_url(base: &str) -> String {
    format!("{}/api/v1/index/query", base.trim_end_matches('/'))
}

/// Download request endpoint
pub fn download_request_url(base: &str) -> String {
    format!("{}/api/v1/downloads/pdf", base.trim_end_matches('/'))
}

/// Single download job endpoint
pub fn download_job_url(base: &str, identifier: &str) -> String {
    format!(
        "{}/api/v1/downloads/pdf/{}",
        base.trim_end_matches('/'),
        urlencoding::encode(identifier)
    )
}

/// Derivative file endpoint
pub fn download_file_url(base: &str, identifier: &str) -> String {
    format!("{}/file", download_job_url(base, identifier))
}

/// Download job listing endpoint
pub fn download_list_url(base: &str, status: Option<&str>) -> String {
    let mut url = format!("{}/api/v1/downloads", base.trim_end_matches('/'));
    if let Some(status) = status {
        url.push_str(&format!("?status={}", urlencoding::encode(status)));
    }
    url
}

/// Single record task endpoint
pub fn task_url(base: &str, id: &uuid::Uuid) -> String {
    format!("{}/api/v1/tasks/{}", base.trim_end_matches('/'), id)
}

/// Record task listing endpoint
pub fn task_list_url(base: &str, task_type: Option<&str>, status: Option<&str>) -> String {
    let mut url = format!("{}/api/v1/tasks", base.trim_end_matches('/'));
    let mut params = Vec::new();
    if let Some(task_type) = task_type {
        params.push(format!("task_type={}", urlencoding::encode(task_type)));
    }
    if let Some(status) = status {
        params.push(format!("status={}", urlencoding::encode(status)));
    }
    if !params.is_empty() {
        url.push('?');
        url.push_str(&params.join("&"));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized() {
        assert_eq!(
            health_url("http://localhost:8000/"),
            "http://localhost:8000/health"
        );
    }

    #[test]
    fn job_identifier_is_encoded() {
        let url = download_job_url("http://localhost:8000", "abc 123");
        assert!(url.ends_with("/abc%20123"));
    }

    #[test]
    fn task_list_url_with_filters() {
        let url = task_list_url("http://x", Some("DELETE_RECORD"), Some("QUEUED"));
        assert_eq!(url, "http://x/api/v1/tasks?task_type=DELETE_RECORD&status=QUEUED");
    }
}
