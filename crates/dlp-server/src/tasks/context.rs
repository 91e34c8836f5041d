//! Shared context for task handlers

use std::sync::Arc;

use crate::config::Config;
use crate::index::SolrClient;

/// Resources every task handler can reach: database pool, index client,
/// and configuration. Cloned into each worker.
#[derive(Clone)]
pub struct WorkerContext {
    pub db: sqlx::PgPool,
    pub index: SolrClient,
    pub config: Arc<Config>,
}

impl WorkerContext {
    pub fn new(db: sqlx::PgPool, index: SolrClient, config: Arc<Config>) -> Self {
        Self { db, index, config }
    }
}
