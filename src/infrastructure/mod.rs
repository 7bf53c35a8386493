mod database;
pub mod metrics;

// Re-export the factory functions for easy access
pub use database::{create_memory_task_store, create_redis_task_store};
pub use metrics::{create_noop_metrics, create_prom_metrics};
