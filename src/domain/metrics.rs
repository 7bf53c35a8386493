use std::sync::Arc;
use std::time::{Duration, Instant};

/// Errors raised by the metrics subsystem.
///
/// None of these may surface to a request being measured; callers on the
/// instrumentation path log and swallow them. Only [`MetricError::Render`]
/// reaches a client, via the scrape endpoint.
#[derive(Debug, thiserror::Error)]
pub enum MetricError {
    /// A metric with this name was already registered.
    #[error("metric `{0}` is already registered")]
    DuplicateMetricName(String),

    /// The supplied labels do not match the metric's declared label names.
    #[error("label set {got:?} does not match declared labels {expected:?} of metric `{metric}`")]
    LabelSetMismatch {
        metric: String,
        expected: Vec<String>,
        got: Vec<String>,
    },

    /// Counters only move forward.
    #[error("counter delta must be non-negative, got {0}")]
    InvalidDelta(i64),

    /// A request timer was stopped twice.
    #[error("request timer was already stopped")]
    TimerAlreadyStopped,

    /// The registry snapshot cannot be serialized.
    #[error("metrics rendering failed: {0}")]
    Render(String),
}

/// Per-request stopwatch, created at request entry and stopped exactly once
/// when the response completes.
///
/// Backed by [`Instant`], so readings are monotonic and immune to wall-clock
/// adjustments.
#[derive(Debug)]
pub struct RequestTimer {
    start: Instant,
    elapsed: Option<Duration>,
}

impl RequestTimer {
    /// Capture the start timestamp.
    pub fn start() -> Self {
        RequestTimer {
            start: Instant::now(),
            elapsed: None,
        }
    }

    /// Stop the timer and return the elapsed time in fractional seconds.
    ///
    /// A second stop fails with [`MetricError::TimerAlreadyStopped`] and
    /// leaves the first reading intact.
    pub fn stop(&mut self) -> Result<f64, MetricError> {
        if self.elapsed.is_some() {
            return Err(MetricError::TimerAlreadyStopped);
        }
        let elapsed = self.start.elapsed();
        self.elapsed = Some(elapsed);
        Ok(elapsed.as_secs_f64())
    }

    /// The reading captured by the first successful [`stop`](Self::stop).
    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.elapsed.map(|d| d.as_secs_f64())
    }
}

/// Abstraction for application metrics (counters, histograms).
pub trait Metrics: Send + Sync + 'static {
    /// Render current metrics in Prometheus text format.
    fn render(&self) -> Result<String, MetricError>;

    /// Record a "task created" event.
    fn record_task_created(&self);

    /// Record one completed HTTP request: stop the timer and file one counter
    /// increment plus one histogram observation under `{method, route, status}`.
    fn record_http_request(&self, timer: RequestTimer, method: &str, route: &str, status: u16);
}

/// Type alias for any backend that implements Metrics.
pub type MetricsPtr = Arc<dyn Metrics>;
