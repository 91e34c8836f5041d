//! Request and response types for the search index

use serde::{Deserialize, Serialize};

/// A single index document. The schema is open-ended, so documents are kept
/// as raw JSON objects and callers pick the fields they need.
pub type SolrDocument = serde_json::Value;

/// Parameters for a select (search) request
#[derive(Debug, Clone, Serialize)]
pub struct SelectParams {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

impl SelectParams {
    /// Count-only request: no rows, just `num_found`
    pub fn count_only(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            fields: None,
            sort: None,
            limit: 0,
            offset: 0,
        }
    }
}

/// Inner result block of a select response
#[derive(Debug, Clone, Deserialize)]
pub struct SelectResult {
    #[serde(rename = "numFound")]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<SolrDocument>,
}

/// Response envelope of a select request
#[derive(Debug, Clone, Deserialize)]
pub struct SelectResponse {
    pub response: SelectResult,
}
