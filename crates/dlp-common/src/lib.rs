//! DLP Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the DLP workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across all DLP workspace
//! members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Job Identifiers**: Deterministic download-job identifier hashing
//! - **Logging**: Tracing subscriber initialization shared by all binaries
//! - **Types**: API data transfer types shared by server and CLI
//!
//! # Example
//!
//! ```no_run
//! use dlp_common::hash::download_job_id;
//!
//! let id = download_job_id(&[Some("PPN123456789"), Some("LOG_0000")]);
//! println!("job identifier: {id}");
//! ```

pub mod error;
pub mod hash;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{DlpError, Result};
