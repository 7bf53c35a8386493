//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers via the `State` extractor. The `AppState` contains shared
//! resources like the task store, the metrics implementation, and the Redis
//! client used for connectivity checks.
//!
//! The state is designed to be cheaply cloneable (using `Arc` internally
//! where needed) so it can be passed efficiently to each request handler
//! without expensive copying of resources.

use crate::domain::{MetricsPtr, TaskStorePtr};
use axum::http::StatusCode;
use redis::Client;

/// Shared application state passed to all Axum handlers.
///
/// This struct serves as the Dependency Injection container for the
/// application. It is built once at startup, never mutated afterwards, and
/// cloned cheaply for each request via Axum's `State` extractor. The
/// instrumentation middleware reaches the metrics registry through it, so
/// there is no process-global metrics state.
///
/// # Fields
///
/// - `redis_client`: Client for creating ephemeral Redis connections (health checks)
/// - `metrics`: Metrics implementation for observability (Prometheus or no-op)
/// - `task_store`: Persistence abstraction for tasks (Redis or in-memory)
#[derive(Clone)]
pub(crate) struct AppState {
    /// Redis client for creating multiplexed async connections on demand.
    redis_client: Client,

    /// Metrics implementation for recording application events.
    ///
    /// Either Prometheus-backed (production) or no-op (testing/development).
    /// Wrapped in `Arc` via `MetricsPtr` for cheap cloning.
    metrics: MetricsPtr,

    /// Task persistence abstraction.
    ///
    /// Wrapped in `Arc` via `TaskStorePtr` for cheap cloning.
    task_store: TaskStorePtr,
}

impl AppState {
    // ---

    pub fn new(redis_client: Client, metrics: MetricsPtr, task_store: TaskStorePtr) -> Self {
        // ---
        AppState {
            redis_client,
            metrics,
            task_store,
        }
    }

    /// Creates a new multiplexed Redis connection.
    ///
    /// Logs an error if connection fails and returns HTTP 500.
    pub(crate) async fn get_conn(&self) -> Result<redis::aio::MultiplexedConnection, StatusCode> {
        // ---
        self.redis_client
            .get_multiplexed_async_connection()
            .await
            .map_err(|err| {
                tracing::error!("Failed to connect to Redis: {:?}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            })
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Get a reference to the task store implementation.
    pub(crate) fn task_store(&self) -> &TaskStorePtr {
        // ---
        &self.task_store
    }
}
