//! Error types for the DLP CLI
//!
//! Errors are user-facing: each message says what went wrong and what to
//! try next.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// API server returned an error response
    #[error("Server error: {0}. Ensure the DLP server is running (check with 'dlp status') and accessible.")]
    Api(String),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check your connection and server URL.")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse server response: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// Requested resource does not exist on the server
    #[error("Not found: {0}")]
    NotFound(String),

    /// The job did not finish within the polling budget
    #[error("Timed out waiting for job '{0}'. Poll it later with 'dlp download get {0}'.")]
    Timeout(String),
}
