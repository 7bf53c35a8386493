//! Prometheus metrics implementation.
//!
//! Concrete implementation of the `Metrics` trait backed by the in-process
//! [`MetricRegistry`]. The registry and the handles for the per-request
//! metric families are created once at startup and travel through
//! `AppState`; nothing here relies on global scope, so every router (and
//! every test) gets its own isolated registry.

use super::process::ProcessCollector;
use super::registry::{CounterHandle, HistogramHandle, MetricDefinition, MetricRegistry};
use crate::config::MetricsConfig;
use crate::domain::{MetricError, Metrics, RequestTimer};

pub struct PrometheusMetrics {
    registry: MetricRegistry,
    http_requests: CounterHandle,
    http_request_duration: HistogramHandle,
    tasks_created: CounterHandle,
    process: ProcessCollector,
}

impl PrometheusMetrics {
    /// Register the request metric families under the configured prefix.
    ///
    /// A duplicate name here is a programming error and fails startup.
    pub fn new(config: &MetricsConfig) -> Result<Self, MetricError> {
        let registry = MetricRegistry::new();

        let http_requests = registry.register_counter(MetricDefinition::counter(
            &format!("{}_http_requests_total", config.prefix),
            "Total number of HTTP requests handled, by method, route and status.",
            &["method", "route", "status"],
        ))?;
        let http_request_duration = registry.register_histogram(MetricDefinition::histogram(
            &format!("{}_http_request_duration_seconds", config.prefix),
            "HTTP request latency in seconds, by method, route and status.",
            &["method", "route", "status"],
            &config.buckets,
        ))?;
        let tasks_created = registry.register_counter(MetricDefinition::counter(
            &format!("{}_tasks_created_total", config.prefix),
            "Total number of tasks created.",
            &[],
        ))?;

        Ok(PrometheusMetrics {
            registry,
            http_requests,
            http_request_duration,
            tasks_created,
            process: ProcessCollector::new(&config.prefix),
        })
    }
}

impl Metrics for PrometheusMetrics {
    fn render(&self) -> Result<String, MetricError> {
        let mut out = super::render_snapshot(&self.registry.snapshot())?;
        self.process.render(&mut out);
        Ok(out)
    }

    fn record_task_created(&self) {
        if let Err(err) = self.tasks_created.increment(&[], 1) {
            tracing::warn!("failed to record task creation: {err}");
        }
    }

    fn record_http_request(&self, mut timer: RequestTimer, method: &str, route: &str, status: u16) {
        let elapsed = match timer.stop() {
            Ok(elapsed) => elapsed,
            Err(err) => {
                tracing::error!("request timer misuse: {err}");
                return;
            }
        };

        let status = status.to_string();
        let labels = [("method", method), ("route", route), ("status", status.as_str())];

        // Counter first, then histogram; both failures stay internal.
        if let Err(err) = self.http_requests.increment(&labels, 1) {
            tracing::warn!("failed to count HTTP request: {err}");
        }
        if let Err(err) = self.http_request_duration.observe(&labels, elapsed) {
            tracing::warn!("failed to record HTTP request duration: {err}");
        }
    }
}
