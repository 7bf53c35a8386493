//! HTTP request instrumentation middleware.
//!
//! Wraps every request/response pair passing through the router, including
//! the fallback, and records one counter increment plus one histogram
//! observation labeled by method, route and status. The middleware never
//! short-circuits a request and never lets a recording failure reach the
//! client.

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use crate::domain::RequestTimer;
use crate::AppState;

/// Route label for requests the router could not resolve.
///
/// Collapsing all unmatched paths into one series keeps arbitrary request
/// strings from growing the label space without bound.
pub const FALLBACK_ROUTE_LABEL: &str = "unknown";

/// Record request metrics for every request passing through the router:
///
/// - **`<prefix>_http_requests_total`** — counter with labels `method`, `route`, `status`
/// - **`<prefix>_http_request_duration_seconds`** — histogram with the same labels
///
/// The route label is the matched route pattern when routing resolved one,
/// otherwise [`FALLBACK_ROUTE_LABEL`].
pub async fn track_requests(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let timer = RequestTimer::start();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| FALLBACK_ROUTE_LABEL.to_string());

    let response = next.run(request).await;

    state
        .metrics()
        .record_http_request(timer, &method, &route, response.status().as_u16());

    response
}
