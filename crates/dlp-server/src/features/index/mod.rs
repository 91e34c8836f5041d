//! Search index feature
//!
//! Query passthrough, record statistics, and asynchronous record deletion.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::index_routes;
