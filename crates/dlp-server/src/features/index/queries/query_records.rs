//! Index query passthrough
//!
//! Forwards a caller-supplied query to the search index. Query construction
//! stays with the caller; this slice only validates the pieces that end up
//! in the sort clause or could blow past the index limits.

use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::features::shared::validation::{
    validate_query, validate_sort_field, validate_sort_order, ValidationError,
};
use crate::index::{IndexError, SelectParams, SolrClient, SolrDocument};

/// Hard cap on rows returned by one query.
pub const MAX_HITS: i64 = 10_000;

/// A records query as posted by API clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsQueryRequest {
    pub query: String,
    #[serde(default)]
    pub result_fields: Option<Vec<String>>,
    #[serde(default)]
    pub sort_fields: Option<Vec<String>>,
    /// "asc" or "desc"; applies to every sort field
    #[serde(default)]
    pub sort_order: Option<String>,
    /// Requested row count; zero or negative means "as many as allowed"
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
    /// Replace the sort list with a random ordering
    #[serde(default)]
    pub randomize: bool,
}

/// Error type for the records query
#[derive(Debug, thiserror::Error)]
pub enum RecordsQueryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

impl Request<Result<Vec<SolrDocument>, RecordsQueryError>> for RecordsQueryRequest {}

impl RecordsQueryRequest {
    /// Validate the request, rejecting malformed sort fields and orders
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_query(&self.query)?;

        if let Some(ref order) = self.sort_order {
            validate_sort_order(order)?;
        }

        if let Some(ref fields) = self.sort_fields {
            for field in fields.iter().filter(|f| !f.is_empty()) {
                validate_sort_field(field)?;
            }
        }

        Ok(())
    }

    /// Effective row count: requested count clamped to the index cap,
    /// non-positive values meaning "maximum"
    pub fn effective_count(&self) -> i64 {
        match self.count {
            Some(count) if count > 0 => count.min(MAX_HITS),
            _ => MAX_HITS,
        }
    }

    fn sort_direction(&self) -> &str {
        match self.sort_order.as_deref() {
            Some("desc") => "desc",
            _ => "asc",
        }
    }

    /// Sort clause for the index, if any.
    ///
    /// Randomized queries sort on one of the index's dynamic `random_*`
    /// fields; each seed value selects one particular shuffle.
    pub fn sort_clause(&self, random_seed: u64) -> Option<String> {
        if self.randomize {
            return Some(format!("random_{} {}", random_seed, self.sort_direction()));
        }

        let direction = self.sort_direction();
        let fields: Vec<String> = self
            .sort_fields
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|f| !f.is_empty())
            .map(|f| format!("{f} {direction}"))
            .collect();

        if fields.is_empty() {
            None
        } else {
            Some(fields.join(", "))
        }
    }
}

#[tracing::instrument(skip(index, request), fields(query = %request.query))]
pub async fn handle(
    index: &SolrClient,
    request: RecordsQueryRequest,
) -> Result<Vec<SolrDocument>, RecordsQueryError> {
    request.validate()?;

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);

    let params = SelectParams {
        query: request.query.clone(),
        fields: request.result_fields.clone(),
        sort: request.sort_clause(seed),
        limit: request.effective_count(),
        offset: request.offset.unwrap_or(0).max(0),
    };

    let response = index.select(&params).await?;
    tracing::trace!(hits = response.response.docs.len(), "records query served");

    Ok(response.response.docs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: serde_json::Value) -> RecordsQueryRequest {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_validation_accepts_plain_query() {
        let req = request(serde_json::json!({
            "query": "DC:varia",
            "sortFields": ["DATECREATED", "SORT_TITLE"],
            "sortOrder": "desc",
            "count": 5
        }));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_empty_query() {
        let req = request(serde_json::json!({"query": "  "}));
        assert!(matches!(
            req.validate(),
            Err(ValidationError::QueryRequired)
        ));
    }

    #[test]
    fn test_validation_rejects_malformed_sort_field() {
        let req = request(serde_json::json!({
            "query": "ISWORK:true",
            "sortFields": ["DATECREATED; DROP"]
        }));
        assert!(matches!(
            req.validate(),
            Err(ValidationError::InvalidSortField(_))
        ));
    }

    #[test]
    fn test_validation_rejects_bad_sort_order() {
        let req = request(serde_json::json!({
            "query": "ISWORK:true",
            "sortOrder": "upwards"
        }));
        assert!(matches!(
            req.validate(),
            Err(ValidationError::InvalidSortOrder(_))
        ));
    }

    #[test]
    fn test_effective_count_clamps() {
        assert_eq!(request(serde_json::json!({"query": "q", "count": 5})).effective_count(), 5);
        assert_eq!(request(serde_json::json!({"query": "q", "count": 0})).effective_count(), MAX_HITS);
        assert_eq!(request(serde_json::json!({"query": "q", "count": -3})).effective_count(), MAX_HITS);
        assert_eq!(
            request(serde_json::json!({"query": "q", "count": MAX_HITS + 1})).effective_count(),
            MAX_HITS
        );
    }

    #[test]
    fn test_sort_clause_joins_fields() {
        let req = request(serde_json::json!({
            "query": "q",
            "sortFields": ["DATECREATED", "SORT_TITLE"],
            "sortOrder": "desc"
        }));
        assert_eq!(
            req.sort_clause(7).as_deref(),
            Some("DATECREATED desc, SORT_TITLE desc")
        );
    }

    #[test]
    fn test_sort_clause_randomized() {
        let req = request(serde_json::json!({"query": "q", "randomize": true}));
        assert_eq!(req.sort_clause(42).as_deref(), Some("random_42 asc"));
    }

    #[test]
    fn test_sort_clause_empty_without_fields() {
        let req = request(serde_json::json!({"query": "q"}));
        assert!(req.sort_clause(1).is_none());
    }
}
