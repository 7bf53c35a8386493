mod process;
mod prometheus_metrics;
mod registry;
mod render;

pub use prometheus_metrics::PrometheusMetrics;
use std::sync::Arc;

// Re-export utilities for internal use within this module
pub(crate) use render::render as render_snapshot;

use crate::config::MetricsConfig;

/// Creates a new Prometheus metrics implementation.
///
/// Builds a fresh registry, registers the HTTP request families and the
/// default process collector under the configured prefix, and returns a
/// metrics instance ready for use.
pub fn create(config: &MetricsConfig) -> anyhow::Result<crate::domain::MetricsPtr> {
    tracing::info!("Initializing Prometheus metrics with prefix `{}`", config.prefix);
    Ok(Arc::new(PrometheusMetrics::new(config)?))
}
