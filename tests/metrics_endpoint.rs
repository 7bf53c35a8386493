use serde_json::json;
use serial_test::serial;
use std::sync::Arc;

mod common;

// NOTE: Every TestServer builds its own router and therefore its own metric
// registry, so counters in these tests always start from zero.

async fn scrape(server: &common::TestServer) -> String {
    // ---
    let res = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap();
    assert!(
        res.status().is_success(),
        "Metrics endpoint should return success"
    );
    res.text().await.unwrap()
}

#[tokio::test]
#[serial]
async fn task_creation_is_counted() {
    // ---
    common::setup_test_env();
    let server = common::TestServer::new().await;

    let res = server
        .client
        .post(server.url("/tasks"))
        .json(&json!({ "title": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["title"], "x");
    assert_eq!(created["done"], false);

    let body = scrape(&server).await;
    assert!(
        body.contains(
            "taskapi_http_requests_total{method=\"POST\",route=\"/tasks\",status=\"201\"} 1\n"
        ),
        "missing POST counter in:\n{body}"
    );
    assert!(body.contains("taskapi_tasks_created_total 1\n"));
}

#[tokio::test]
#[serial]
async fn failed_task_creation_is_counted_separately() {
    // ---
    common::setup_test_env();
    let server = common::TestServer::new().await;

    let res = server
        .client
        .post(server.url("/tasks"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let body = scrape(&server).await;
    assert!(body.contains(
        "taskapi_http_requests_total{method=\"POST\",route=\"/tasks\",status=\"400\"} 1\n"
    ));
    // No task was created, so the 201 series must not exist.
    assert!(!body.contains("taskapi_http_requests_total{method=\"POST\",route=\"/tasks\",status=\"201\"}"));
    assert!(!body.contains("taskapi_tasks_created_total 1"));
}

#[tokio::test]
#[serial]
async fn health_requests_accumulate_in_counter_and_histogram() {
    // ---
    common::setup_test_env();
    let server = common::TestServer::new().await;

    for _ in 0..5 {
        let res = server
            .client
            .get(server.url("/health"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }

    let body = scrape(&server).await;
    assert!(body.contains(
        "taskapi_http_requests_total{method=\"GET\",route=\"/health\",status=\"200\"} 5\n"
    ));
    assert!(body.contains(
        "taskapi_http_request_duration_seconds_count{method=\"GET\",route=\"/health\",status=\"200\"} 5\n"
    ));
    assert!(body.contains(
        "taskapi_http_request_duration_seconds_bucket{method=\"GET\",route=\"/health\",status=\"200\",le=\"+Inf\"} 5\n"
    ));
}

#[tokio::test]
#[serial]
async fn unmatched_paths_are_recorded_under_the_fallback_label() {
    // ---
    common::setup_test_env();
    let server = common::TestServer::new().await;

    let res = server
        .client
        .get(server.url("/no/such/route"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    let body = scrape(&server).await;
    assert!(body.contains(
        "taskapi_http_requests_total{method=\"GET\",route=\"unknown\",status=\"404\"} 1\n"
    ));
    // The arbitrary path must not become a series of its own.
    assert!(!body.contains("/no/such/route"));
}

#[tokio::test]
#[serial]
async fn scrape_requests_are_counted_like_any_other() {
    // ---
    common::setup_test_env();
    let server = common::TestServer::new().await;

    // The first scrape is recorded once its response completes...
    let _ = scrape(&server).await;

    // ...so the second scrape sees it.
    let body = scrape(&server).await;
    assert!(body.contains(
        "taskapi_http_requests_total{method=\"GET\",route=\"/metrics\",status=\"200\"} 1\n"
    ));
}

#[tokio::test]
#[serial]
async fn metrics_include_help_and_type_comments() {
    // ---
    common::setup_test_env();
    let server = common::TestServer::new().await;

    let _ = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();

    let body = scrape(&server).await;
    assert!(body.contains("# HELP taskapi_http_requests_total "));
    assert!(body.contains("# TYPE taskapi_http_requests_total counter"));
    assert!(body.contains("# TYPE taskapi_http_request_duration_seconds histogram"));
}

#[tokio::test]
#[serial]
async fn metrics_content_type_is_correct() {
    // ---
    common::setup_test_env();
    let server = common::TestServer::new().await;

    let res = server
        .client
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_success());

    let content_type = res
        .headers()
        .get("content-type")
        .expect("metrics response should have a content type")
        .to_str()
        .unwrap();
    assert!(
        content_type.starts_with("text/plain; version=0.0.4"),
        "unexpected content type: {content_type}"
    );
}

#[tokio::test]
#[serial]
async fn metrics_endpoint_with_noop() {
    // ---
    // Set environment to use noop metrics
    common::setup_test_env();
    std::env::set_var("TASKAPI_METRICS_TYPE", "noop");

    let server = common::TestServer::new().await;

    // Hit some endpoints
    let _ = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();

    // Should still return success even with noop metrics
    let body = scrape(&server).await;
    assert!(body.is_empty(), "noop metrics render nothing, got: {body}");

    // Clean up environment variable
    std::env::remove_var("TASKAPI_METRICS_TYPE");
}

#[tokio::test]
#[serial]
async fn metrics_endpoint_survives_load() {
    // ---
    common::setup_test_env();

    let server = Arc::new(common::TestServer::new().await);

    // Generate some load
    let futures = (0..20).map(|i| {
        let server = Arc::clone(&server);
        async move {
            let endpoint = match i % 3 {
                0 => "/health",
                1 => "/",
                _ => "/metrics",
            };
            server.client.get(server.url(endpoint)).send().await
        }
    });

    let responses = futures::future::join_all(futures).await;

    // All requests should succeed
    for (i, response) in responses.into_iter().enumerate() {
        // ---

        let response = response.unwrap_or_else(|_| panic!("Request {i} should succeed"));
        assert!(
            response.status().is_success(),
            "Request {i} should return success"
        );
    }

    // Now check that the load shows up in the counters
    let body = scrape(&server).await;
    assert!(body.contains(
        "taskapi_http_requests_total{method=\"GET\",route=\"/health\",status=\"200\"} 7\n"
    ));
}
