//! Feature modules implementing the DLP API
//!
//! Each feature is a vertical slice with its own commands, queries, and
//! routes, following a CQRS layout:
//!
//! - **downloads**: the asynchronous download-job lifecycle (request,
//!   poll, fetch file, prerender)
//! - **index**: search-index query passthrough, statistics, and
//!   asynchronous record deletion
//! - **tasks**: status polling for queued background work
//!
//! Commands and queries implement the mediator pattern using the `mediator`
//! crate; route handlers stay thin and convert slice errors into
//! [`crate::error::AppError`] responses.

pub mod downloads;
pub mod index;
pub mod shared;
pub mod tasks;

use axum::Router;
use std::sync::Arc;

use crate::config::Config;
use crate::index::SolrClient;
use crate::tasks::TaskQueue;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool
    pub db: sqlx::PgPool,
    /// Search index client
    pub index: SolrClient,
    /// Task queue producer handles
    pub queue: TaskQueue,
    /// Server configuration
    pub config: Arc<Config>,
}

/// Creates the main API router with all feature routes mounted
///
/// Each feature is mounted under its own path prefix:
/// - `/downloads` - download job lifecycle
/// - `/index` - search index passthrough and statistics
/// - `/tasks` - record task polling
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/downloads", downloads::downloads_routes())
        .nest("/index", index::index_routes())
        .nest("/tasks", tasks::tasks_routes())
        .with_state(state)
}
