//! Record task feature
//!
//! Status polling for queued background work and the usage-indexing enqueue
//! endpoint.

pub mod queries;
pub mod routes;

pub use routes::tasks_routes;
