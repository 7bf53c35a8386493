use crate::domain::{MetricError, Metrics, RequestTimer};

/// No-op metrics implementation for testing.
pub struct NoopMetrics;

impl NoopMetrics {
    pub fn new() -> Self {
        NoopMetrics
    }
}

impl Metrics for NoopMetrics {
    // ---
    fn render(&self) -> Result<String, MetricError> {
        Ok(String::new())
    }
    fn record_task_created(&self) {}
    fn record_http_request(&self, _: RequestTimer, _: &str, _: &str, _: u16) {}
}
