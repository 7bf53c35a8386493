mod metrics;
mod tasks;

// Publicly expose the Metrics abstraction
pub use metrics::{MetricError, Metrics, MetricsPtr, RequestTimer};

// Publicly expose the task model and persistence abstraction
pub use tasks::{Task, TaskStore, TaskStorePtr};
