//! Shared validation for request input
//!
//! User-supplied identifiers end up in file names, index queries, and task
//! payloads, so they are validated once here and rejected at the REST
//! boundary with 400.

use thiserror::Error;

/// Maximum accepted length for a persistent identifier.
pub const MAX_PI_LENGTH: usize = 64;

/// Maximum accepted length for a logical division id.
pub const MAX_LOG_ID_LENGTH: usize = 64;

/// Maximum accepted length for a raw index query.
pub const MAX_QUERY_LENGTH: usize = 4096;

/// Validation failures for request input
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Persistent identifier is required and cannot be empty")]
    PiRequired,

    #[error("Persistent identifier exceeds {MAX_PI_LENGTH} characters")]
    PiTooLong,

    #[error("Persistent identifier may only contain letters, digits, '.', '_', ':' and '-'")]
    PiInvalidChars,

    #[error("Division id exceeds {MAX_LOG_ID_LENGTH} characters")]
    LogIdTooLong,

    #[error("Division id may only contain letters, digits, '_' and '-'")]
    LogIdInvalidChars,

    #[error("Query is required and cannot be empty")]
    QueryRequired,

    #[error("Query exceeds {MAX_QUERY_LENGTH} characters")]
    QueryTooLong,

    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("Sort order must be 'asc' or 'desc', got '{0}'")]
    InvalidSortOrder(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

/// Validate a persistent identifier.
///
/// PIs become file name components and query terms, so anything that could
/// escape either context (path separators, whitespace, quotes) is rejected.
pub fn validate_pi(pi: &str) -> Result<(), ValidationError> {
    if pi.is_empty() {
        return Err(ValidationError::PiRequired);
    }
    if pi.len() > MAX_PI_LENGTH {
        return Err(ValidationError::PiTooLong);
    }
    if !pi
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '-'))
    {
        return Err(ValidationError::PiInvalidChars);
    }

    Ok(())
}

/// Validate a logical division id (optional on most requests)
pub fn validate_log_id(log_id: &str) -> Result<(), ValidationError> {
    if log_id.len() > MAX_LOG_ID_LENGTH {
        return Err(ValidationError::LogIdTooLong);
    }
    if !log_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
    {
        return Err(ValidationError::LogIdInvalidChars);
    }

    Ok(())
}

/// Normalize a requested division id: empty and `-` both mean "whole record"
pub fn normalize_log_id(log_id: Option<&str>) -> Option<String> {
    log_id
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "-")
        .map(ToString::to_string)
}

/// Validate a raw index query
pub fn validate_query(query: &str) -> Result<(), ValidationError> {
    if query.trim().is_empty() {
        return Err(ValidationError::QueryRequired);
    }
    if query.len() > MAX_QUERY_LENGTH {
        return Err(ValidationError::QueryTooLong);
    }

    Ok(())
}

/// Validate a sort field name.
///
/// Index field names are plain identifiers; anything else would let request
/// input splice arbitrary text into the sort clause.
pub fn validate_sort_field(field: &str) -> Result<(), ValidationError> {
    if field.is_empty()
        || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ValidationError::InvalidSortField(field.to_string()));
    }

    Ok(())
}

/// Validate a sort order keyword
pub fn validate_sort_order(order: &str) -> Result<(), ValidationError> {
    match order {
        "asc" | "desc" => Ok(()),
        other => Err(ValidationError::InvalidSortOrder(other.to_string())),
    }
}

/// Validate an observer email address (shape only, no deliverability check)
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail(email.to_string());

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || email.chars().any(char::is_whitespace)
        || email.len() > 254
    {
        return Err(invalid());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_pi_accepts_common_identifiers() {
        assert!(validate_pi("PPN123456789").is_ok());
        assert!(validate_pi("urn:nbn:de:101-2018").is_ok());
        assert!(validate_pi("18979459_1830").is_ok());
        assert!(validate_pi("AC03343066.1").is_ok());
    }

    #[test]
    fn test_validate_pi_rejects_escapes() {
        assert_eq!(validate_pi(""), Err(ValidationError::PiRequired));
        assert_eq!(validate_pi("../etc/passwd"), Err(ValidationError::PiInvalidChars));
        assert_eq!(validate_pi("a b"), Err(ValidationError::PiInvalidChars));
        assert_eq!(validate_pi("pi\"quote"), Err(ValidationError::PiInvalidChars));
        assert_eq!(validate_pi(&"x".repeat(65)), Err(ValidationError::PiTooLong));
    }

    #[test]
    fn test_validate_log_id() {
        assert!(validate_log_id("LOG_0000").is_ok());
        assert!(validate_log_id("div-17").is_ok());
        assert_eq!(
            validate_log_id("LOG 0000"),
            Err(ValidationError::LogIdInvalidChars)
        );
    }

    #[test]
    fn test_normalize_log_id() {
        assert_eq!(normalize_log_id(Some("LOG_0001")), Some("LOG_0001".to_string()));
        assert_eq!(normalize_log_id(Some("-")), None);
        assert_eq!(normalize_log_id(Some("  ")), None);
        assert_eq!(normalize_log_id(Some("")), None);
        assert_eq!(normalize_log_id(None), None);
    }

    #[test]
    fn test_validate_query() {
        assert!(validate_query("+(ISWORK:*)").is_ok());
        assert_eq!(validate_query("   "), Err(ValidationError::QueryRequired));
        assert_eq!(
            validate_query(&"q".repeat(MAX_QUERY_LENGTH + 1)),
            Err(ValidationError::QueryTooLong)
        );
    }

    #[test]
    fn test_validate_sort_field() {
        assert!(validate_sort_field("DATECREATED").is_ok());
        assert!(validate_sort_field("SORT_TITLE").is_ok());
        assert!(validate_sort_field("random_42").is_ok());
        assert!(validate_sort_field("TITLE desc").is_err());
        assert!(validate_sort_field("TITLE;drop").is_err());
        assert!(validate_sort_field("").is_err());
    }

    #[test]
    fn test_validate_sort_order() {
        assert!(validate_sort_order("asc").is_ok());
        assert!(validate_sort_order("desc").is_ok());
        assert!(validate_sort_order("sideways").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("me@he.re").is_ok());
        assert!(validate_email("reader@library.example.org").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@nolocal.org").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("sp ace@x.org").is_err());
    }
}
