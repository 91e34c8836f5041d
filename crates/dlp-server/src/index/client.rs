//! HTTP client for the search index

use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::config::IndexConfig;

use super::types::{SelectParams, SelectResponse, SolrDocument};
use super::{IndexError, IndexResult};

/// Client for one index core
#[derive(Debug, Clone)]
pub struct SolrClient {
    http: Client,
    base_url: String,
}

impl SolrClient {
    /// Create a client from index configuration
    pub fn new(config: &IndexConfig) -> IndexResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client against an explicit base URL (tests)
    pub fn with_base_url(base_url: impl Into<String>) -> IndexResult<Self> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a select (search) request via the JSON request API
    #[tracing::instrument(skip(self), fields(query = %params.query))]
    pub async fn select(&self, params: &SelectParams) -> IndexResult<SelectResponse> {
        let mut body = json!({
            "query": params.query,
            "limit": params.limit,
            "offset": params.offset,
        });

        if let Some(ref fields) = params.fields {
            body["fields"] = json!(fields);
        }
        if let Some(ref sort) = params.sort {
            body["sort"] = json!(sort);
        }

        let response = self
            .http
            .post(format!("{}/select", self.base_url))
            .json(&body)
            .send()
            .await?;

        let response = check_status(response).await?;
        let parsed: SelectResponse = response
            .json()
            .await
            .map_err(|e| IndexError::Malformed(e.to_string()))?;

        Ok(parsed)
    }

    /// Number of documents matching a query
    pub async fn hit_count(&self, query: &str) -> IndexResult<u64> {
        let response = self.select(&SelectParams::count_only(query)).await?;
        Ok(response.response.num_found)
    }

    /// Add or replace documents, committing immediately
    pub async fn add_documents(&self, docs: &[SolrDocument]) -> IndexResult<()> {
        let response = self
            .http
            .post(format!("{}/update?commit=true", self.base_url))
            .json(&docs)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    /// Delete every document belonging to a record, committing immediately
    pub async fn delete_record(&self, pi: &str) -> IndexResult<()> {
        let body = json!({
            "delete": { "query": format!("PI:\"{pi}\" OR PI_TOPSTRUCT:\"{pi}\"") }
        });

        let response = self
            .http
            .post(format!("{}/update?commit=true", self.base_url))
            .json(&body)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    /// Liveness probe against the core's ping handler
    pub async fn ping(&self) -> IndexResult<()> {
        let response = self
            .http
            .get(format!("{}/admin/ping", self.base_url))
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> IndexResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(IndexError::Status {
        status: status.as_u16(),
        body: body.chars().take(512).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = SolrClient::with_base_url("http://localhost:8983/solr/records/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8983/solr/records");
    }
}
