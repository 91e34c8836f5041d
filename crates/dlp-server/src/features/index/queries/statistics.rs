//! Index statistics query

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::features::shared::validation::{validate_query, ValidationError};
use crate::index::{IndexError, SolrClient};

/// Query matching every top-level record in the index.
pub const DEFAULT_STATISTICS_QUERY: &str = "+(ISWORK:*)";

/// Query for the indexed-records count
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsQuery {
    /// Optional filter; defaults to all top-level records
    #[serde(default)]
    pub query: Option<String>,
}

/// Count of matching records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub count: u64,
}

/// Error type for the statistics query
#[derive(Debug, thiserror::Error)]
pub enum StatisticsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

impl Request<Result<StatisticsResponse, StatisticsError>> for StatisticsQuery {}

pub async fn handle(
    index: &SolrClient,
    query: StatisticsQuery,
) -> Result<StatisticsResponse, StatisticsError> {
    let query = query
        .query
        .unwrap_or_else(|| DEFAULT_STATISTICS_QUERY.to_string());
    validate_query(&query)?;

    let count = index.hit_count(&query).await?;

    Ok(StatisticsResponse { count })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_param_is_optional() {
        let query: StatisticsQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(query.query.is_none());
    }
}
