// src/lib.rs
use anyhow::Result;
use app_state::AppState;
use axum::{routing::get, Router};

use handlers::{create_task, health_check, list_tasks, metrics_handler, root_handler};
use redis::Client;
use std::env;

// Public exports (visible outside this module)
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod handlers;
mod infrastructure;
mod middleware;

pub use config::*;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_memory_task_store, // ---
    create_noop_metrics,
    create_prom_metrics,
    create_redis_task_store,
};

/// Build the HTTP router with metrics and task-store implementations
/// determined by environment variables.
pub fn create_router() -> Result<Router> {
    // ---
    // Load all configuration from environment
    let config = AppConfig::from_env()?;

    // Determine metrics implementation from environment
    let metrics_type = env::var("TASKAPI_METRICS_TYPE").unwrap_or_else(|_| "prom".to_string());
    let metrics = if metrics_type == "noop" {
        create_noop_metrics()?
    } else {
        create_prom_metrics(&config.metrics)?
    };

    tracing_subscriber::fmt::try_init().ok(); // ✅ Ignores if already initialized

    // Create infrastructure dependencies
    let redis_client = Client::open(config.redis.url.clone())?;
    let store_type = env::var("TASKAPI_TASK_STORE").unwrap_or_else(|_| "redis".to_string());
    let task_store = if store_type == "memory" {
        create_memory_task_store()
    } else {
        create_redis_task_store(redis_client.clone())
    };

    // Build application state with all dependencies
    let app_state = AppState::new(redis_client, metrics, task_store);

    // Build router; the instrumentation layer wraps every route AND the
    // fallback, so unmatched paths are counted too.
    //
    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/tasks", get(list_tasks).post(create_task))
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            middleware::track_requests,
        ))
        .with_state(app_state);

    Ok(router)
}
