//! DLP Server - Main entry point

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use dlp_common::logging::{init_logging, LogConfig};
use serde_json::json;
use std::{net::SocketAddr, str::FromStr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tracing::info;

use dlp_server::{
    config::Config,
    db, features,
    features::FeatureState,
    index::SolrClient,
    middleware,
    tasks::{self, Schedule, TaskQueue, WorkerContext},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; LOG_* environment variables override the defaults
    let log_config = LogConfig::default()
        .with_file_prefix("dlp-server")
        .with_filter_directives("dlp_server=debug,tower_http=debug,sqlx=info")
        .with_env_overrides()?;

    init_logging(&log_config)?;

    info!("Starting DLP Server");

    // Load configuration
    let config = Arc::new(Config::load()?);
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    // Initialize database connection pool
    let db_pool = db::create_pool(&config.database).await?;
    info!("Database connection pool established");

    // Run migrations
    sqlx::migrate!("../../migrations")
        .run(&db_pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
    info!("Database migrations completed");

    // Initialize search index client
    let index = SolrClient::new(&config.index)?;
    info!("Search index client initialized for {}", index.base_url());

    // Set up the task queue and start workers if enabled
    TaskQueue::setup(&db_pool).await?;
    let queue = TaskQueue::new(&db_pool);

    let _worker_handle = if config.tasks.enabled {
        let schedule = Schedule::from_str(&config.tasks.sweep_schedule)
            .map_err(|e| anyhow::anyhow!("Invalid sweep schedule: {e}"))?;
        let ctx = WorkerContext::new(db_pool.clone(), index.clone(), config.clone());
        let handle = tasks::start_workers(ctx, queue.clone(), schedule);
        info!("Task workers started");
        Some(handle)
    } else {
        info!("Task workers are disabled (TASKS_ENABLED=false)");
        None
    };

    // Create application state
    let state = FeatureState {
        db: db_pool,
        index,
        queue,
        config: config.clone(),
    };

    // Build the application router
    let app = create_router(state, &config);

    // Create socket address
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_router(state: FeatureState, config: &Config) -> Router {
    let feature_routes = features::router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
        .nest("/api/v1", feature_routes)
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Health check handler: database connectivity plus index ping
async fn health_check(State(state): State<FeatureState>) -> Result<Response, StatusCode> {
    let database_ok = sqlx::query("SELECT 1").fetch_one(&state.db).await.is_ok();
    let index_ok = state.index.ping().await.is_ok();

    if database_ok && index_ok {
        Ok((
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "index": "connected"
            })),
        )
            .into_response())
    } else {
        tracing::error!(database_ok, index_ok, "health check failed");
        Err(StatusCode::SERVICE_UNAVAILABLE)
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    // Give ongoing requests time to complete
    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
