//! HTTP API client for the DLP server

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

use dlp_common::types::{DownloadJobView, RecordTaskView};

use crate::api::endpoints;
use crate::error::{CliError, Result};

// ============================================================================
// API Client Constants
// ============================================================================

/// Default timeout for API requests in seconds.
/// Can be overridden via DLP_API_TIMEOUT_SECS environment variable.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 120;

/// Default DLP server URL when not specified via environment variable.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// API client for the DLP server
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: String) -> Result<Self> {
        let timeout_secs = std::env::var("DLP_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Create from an explicit URL, falling back to environment variables
    pub fn from_env(override_url: Option<String>) -> Result<Self> {
        let base_url = override_url
            .or_else(|| std::env::var("DLP_SERVER_URL").ok())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        Self::new(base_url)
    }

    /// Check server health
    pub async fn health_check(&self) -> Result<Option<Value>> {
        let url = endpoints::health_url(&self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => Ok(Some(response.json().await?)),
            Ok(_) | Err(_) => Ok(None),
        }
    }

    /// Indexed-record count
    pub async fn statistics(&self, query: Option<&str>) -> Result<u64> {
        let mut url = endpoints::statistics_url(&self.base_url);
        if let Some(query) = query {
            url.push_str(&format!("?query={}", urlencoding::encode(query)));
        }

        let response: Value = self.get_json(&url).await?;
        Ok(response["count"].as_u64().unwrap_or(0))
    }

    /// Post a raw query to the index, returning the matching documents
    pub async fn query(
        &self,
        query: &str,
        count: i64,
        fields: &[String],
        sort_fields: &[String],
        sort_order: &str,
    ) -> Result<Vec<Value>> {
        let mut body = json!({
            "query": query,
            "count": count,
            "sortOrder": sort_order,
        });
        if !fields.is_empty() {
            body["resultFields"] = json!(fields);
        }
        if !sort_fields.is_empty() {
            body["sortFields"] = json!(sort_fields);
        }

        let response = self
            .client
            .post(endpoints::query_url(&self.base_url))
            .json(&body)
            .send()
            .await?;

        Self::expect_json(response).await
    }

    /// Request a PDF derivative (idempotent)
    pub async fn request_download(
        &self,
        pi: &str,
        log_id: Option<&str>,
        email: Option<&str>,
    ) -> Result<DownloadJobView> {
        let mut body = json!({ "pi": pi });
        if let Some(log_id) = log_id {
            body["logId"] = json!(log_id);
        }
        if let Some(email) = email {
            body["email"] = json!(email);
        }

        let response = self
            .client
            .post(endpoints::download_request_url(&self.base_url))
            .json(&body)
            .send()
            .await?;

        Self::expect_json(response).await
    }

    /// Poll one download job
    pub async fn get_download(&self, identifier: &str) -> Result<DownloadJobView> {
        let url = endpoints::download_job_url(&self.base_url, identifier);
        self.get_json(&url).await
    }

    /// Fetch a finished derivative's bytes
    pub async fn fetch_download(&self, identifier: &str) -> Result<Vec<u8>> {
        let url = endpoints::download_file_url(&self.base_url, identifier);
        let response = self.client.get(&url).send().await?;

        match response.status() {
            status if status.is_success() => Ok(response.bytes().await?.to_vec()),
            StatusCode::NOT_FOUND => Err(CliError::NotFound(format!(
                "download job '{identifier}'"
            ))),
            StatusCode::CONFLICT => Err(CliError::Api(format!(
                "job '{identifier}' is not ready; poll it with 'dlp download get {identifier}'"
            ))),
            status => Err(CliError::Api(format!("unexpected HTTP status {status}"))),
        }
    }

    /// List download jobs
    pub async fn list_downloads(&self, status: Option<&str>) -> Result<Value> {
        let url = endpoints::download_list_url(&self.base_url, status);
        self.get_json(&url).await
    }

    /// Get one record task
    pub async fn get_task(&self, id: &Uuid) -> Result<RecordTaskView> {
        let url = endpoints::task_url(&self.base_url, id);
        self.get_json(&url).await
    }

    /// List record tasks
    pub async fn list_tasks(
        &self,
        task_type: Option<&str>,
        status: Option<&str>,
    ) -> Result<Value> {
        let url = endpoints::task_list_url(&self.base_url, task_type, status);
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await?;
        Self::expect_json(response).await
    }

    async fn expect_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CliError::NotFound("requested resource".to_string()));
        }

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or_default();
            let message = body["error"]["message"]
                .as_str()
                .map(ToString::to_string)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(CliError::Api(message));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn statistics_reads_count_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/index/statistics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"count": 7})))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        assert_eq!(client.statistics(None).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn error_body_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/index/query"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"message": "Invalid sort field: X;Y", "status": 400}
            })))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let err = client.query("q", 1, &[], &[], "asc").await.unwrap_err();
        assert!(matches!(err, CliError::Api(ref msg) if msg.contains("Invalid sort field")));
    }

    #[tokio::test]
    async fn health_check_is_none_when_down() {
        let client = ApiClient::new("http://127.0.0.1:1".to_string()).unwrap();
        assert!(client.health_check().await.unwrap().is_none());
    }
}
