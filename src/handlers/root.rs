use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Welcome to the Task API 👋
Version: {version}

Available endpoints:
  - GET    /tasks            - List all tasks, newest first
  - POST   /tasks            - Create a task ({{"title": "..."}})
  - GET    /health           - Light health check
  - GET    /health?mode=full - Full health check (includes Redis)
  - GET    /metrics          - Prometheus metrics snapshot

Every request is counted and timed; scrape /metrics to see the totals.
"#
    )
}
