use crate::app_state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

/// Handler for the `/metrics` endpoint.
///
/// Returns metrics in Prometheus text format for scraping.
/// Uses the metrics implementation from AppState, which could be
/// either Prometheus or no-op depending on configuration.
///
/// A rendering failure surfaces here, and only here, as a `500` with a
/// plain-text message; it never affects any other request path.
pub async fn metrics_handler(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // ---

    let metrics_text = app_state.metrics().render().map_err(|err| {
        tracing::error!("failed to render metrics: {err}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics rendering failed: {err}"),
        )
    })?;

    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        metrics_text,
    ))
}
