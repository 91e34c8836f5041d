//! Error types for DLP

use thiserror::Error;

/// Result type alias for DLP operations
pub type Result<T> = std::result::Result<T, DlpError>;

/// Main error type for DLP
#[derive(Error, Debug)]
pub enum DlpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Search index unreachable: {0}")]
    IndexUnreachable(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
