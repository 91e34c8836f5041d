//! Shared pagination for list queries

use serde::{Deserialize, Serialize};

/// Default items per page for list endpoints.
pub const DEFAULT_PER_PAGE: i64 = 20;

/// Upper bound on items per page.
pub const MAX_PER_PAGE: i64 = 100;

/// Pagination request parameters (1-indexed page)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaginationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

impl PaginationParams {
    /// Page number, defaulting to 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Items per page, defaulting to [`DEFAULT_PER_PAGE`], clamped to
    /// 1..=[`MAX_PER_PAGE`]
    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    /// SQL OFFSET for the current page
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }

    /// Reject out-of-range explicit parameters
    pub fn validate(&self) -> Result<(), &'static str> {
        if matches!(self.page, Some(p) if p < 1) {
            return Err("Page must be greater than 0");
        }
        if matches!(self.per_page, Some(pp) if !(1..=MAX_PER_PAGE).contains(&pp)) {
            return Err("Per page must be between 1 and 100");
        }
        Ok(())
    }
}

/// Pagination metadata attached to list responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMetadata {
    /// Build metadata from request parameters and the total row count
    pub fn from_params(params: &PaginationParams, total: i64) -> Self {
        let page = params.page();
        let per_page = params.per_page();
        let pages = if total == 0 { 0 } else { (total + per_page - 1) / per_page };

        Self {
            page,
            per_page,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}

/// A page of items plus its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMetadata,
}

impl<T> Paginated<T> {
    /// Assemble a response page from items, parameters, and total count
    pub fn from_items(items: Vec<T>, params: &PaginationParams, total: i64) -> Self {
        Self {
            items,
            pagination: PaginationMetadata::from_params(params, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_offset_of_later_page() {
        let params = PaginationParams { page: Some(3), per_page: Some(50) };
        assert_eq!(params.offset(), 100);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let bad_page = PaginationParams { page: Some(0), per_page: None };
        assert!(bad_page.validate().is_err());

        let bad_per_page = PaginationParams { page: None, per_page: Some(MAX_PER_PAGE + 1) };
        assert!(bad_per_page.validate().is_err());

        let ok = PaginationParams { page: Some(2), per_page: Some(10) };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_metadata_page_math() {
        let params = PaginationParams { page: Some(2), per_page: Some(10) };
        let meta = PaginationMetadata::from_params(&params, 25);
        assert_eq!(meta.pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);

        let empty = PaginationMetadata::from_params(&params, 0);
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_next);
    }
}
