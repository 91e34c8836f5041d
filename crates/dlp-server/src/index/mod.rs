//! Search index client
//!
//! Thin HTTP client for the Solr-style search index: query passthrough,
//! hit counting, document updates, and record deletion. Query construction
//! stays with the caller; this module only ships queries over the wire.

mod client;
mod types;

pub use client::SolrClient;
pub use types::{SelectParams, SelectResponse, SelectResult, SolrDocument};

use thiserror::Error;

/// Errors from talking to the search index
#[derive(Error, Debug)]
pub enum IndexError {
    /// The index did not answer (connect, timeout, DNS)
    #[error("index unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The index answered with a non-success HTTP status
    #[error("index returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected shape
    #[error("malformed index response: {0}")]
    Malformed(String),
}

pub type IndexResult<T> = Result<T, IndexError>;
