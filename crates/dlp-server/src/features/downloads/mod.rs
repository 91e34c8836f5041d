//! Download job feature
//!
//! The asynchronous download-job lifecycle: requesting PDF derivatives,
//! polling job status, fetching finished files, and enqueuing per-page
//! prerendering.

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use routes::downloads_routes;
