//! DLP Server Library
//!
//! HTTP server for presenting digitized library holdings.
//!
//! # Overview
//!
//! The DLP server provides a REST API around a search index and a relational
//! database for digitized records:
//!
//! - **Index Endpoints**: query passthrough and statistics against the
//!   Solr-style search index
//! - **Download Jobs**: idempotent, asynchronously rendered PDF derivatives
//!   with status polling
//! - **Record Tasks**: queued background work (record deletion, page
//!   prerendering, usage indexing) with a status-poll endpoint
//! - **Database Management**: PostgreSQL integration with SQLx
//! - **Configuration**: environment-based configuration management
//! - **Middleware**: CORS, request logging, response compression
//!
//! # Architecture
//!
//! Features are organized as vertical slices (commands, queries, routes)
//! following a CQRS layout:
//!
//! - **Commands** (write operations) mutate job or task state and enqueue
//!   work on the apalis queue. Executed via HTTP POST.
//! - **Queries** (read operations) read job/task/index state. Executed via
//!   HTTP GET (the index query passthrough uses POST because its request
//!   body is a full query description).
//!
//! Background workers consume the queue: each handler performs one unit of
//! work for one dequeued task and reports success or failure; ordering and
//! at-most-one-concurrent-handler-per-task are the queue backend's concern.
//!
//! ## Framework Stack
//!
//! - **Axum**: web framework
//! - **SQLx**: PostgreSQL access
//! - **Apalis**: PostgreSQL-backed task queue plus cron scheduling
//! - **Reqwest**: HTTP client for the search index
//!
//! # Example
//!
//! ```no_run
//! use dlp_server::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     println!("would bind {}:{}", config.server.host, config.server.port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod index;
pub mod middleware;
pub mod tasks;

// Re-export commonly used types
pub use error::{AppError, AppResult};
