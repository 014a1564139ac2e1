// ABOUTME: Integration tests for the HTTP build endpoints.
// ABOUTME: Drives the router with oneshot requests against faked external systems.

mod support;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use kaas_build::server::create_router;
use serde_json::{Value, json};
use support::*;
use tower::ServiceExt;

async fn send(h: Harness, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let router = create_router(Arc::new(h.pipeline));
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_is_ok() {
    let router = create_router(Arc::new(Harness::default_repo().pipeline));
    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_returns_image() {
    let body = json!({"repo_url": "https://example.com/repo.git"}).to_string();
    let (status, value) = send(Harness::default_repo(), Method::POST, "/build", Some(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"image": "svc:1"}));
}

#[tokio::test]
async fn missing_repo_url_is_bad_request() {
    let h = Harness::default_repo();
    let source = h.source.clone();
    let body = json!({"repo_branch": "main"}).to_string();

    let (status, value) = send(h, Method::POST, "/build", Some(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["err"].as_str().unwrap().starts_with("Bad request"));
    assert!(source.clone_dirs().is_empty());
}

#[tokio::test]
async fn unparseable_json_is_bad_request() {
    let (status, value) =
        send(Harness::default_repo(), Method::POST, "/build", Some("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(value["err"].is_string());
}

#[tokio::test]
async fn malformed_inline_config_is_bad_request() {
    let h = Harness::default_repo();
    let source = h.source.clone();
    let body = json!({
        "repo_url": "https://example.com/repo.git",
        "deploy_config": "{broken: [yaml"
    })
    .to_string();

    let (status, _) = send(h, Method::POST, "/build", Some(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(source.clone_dirs().is_empty());
}

#[tokio::test]
async fn pipeline_failure_is_server_error() {
    let h = Harness::new(
        FakeSource::repo(),
        FakeEngine::supporting(vec![arm64()]),
        FakeCluster::default(),
    );
    let body = json!({"repo_url": "https://example.com/repo.git"}).to_string();

    let (status, value) = send(h, Method::POST, "/build", Some(&body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = value["err"].as_str().unwrap();
    assert!(message.starts_with("arch-check failed"), "{message}");
    assert!(message.contains("does not support linux/amd64"));
}

#[tokio::test]
async fn restart_patches_named_workload() {
    let h = Harness::new(
        FakeSource::repo(),
        FakeEngine::default(),
        FakeCluster::default().with_workload("svc"),
    );
    let body = json!({"repo_url": "https://example.com/repo.git"}).to_string();

    let (status, value) = send(h, Method::PATCH, "/build/svc", Some(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"image": "svc:1"}));
}

#[tokio::test]
async fn restart_of_missing_workload_is_server_error() {
    let body = json!({"repo_url": "https://example.com/repo.git"}).to_string();
    let (status, value) =
        send(Harness::default_repo(), Method::PATCH, "/build/svc", Some(&body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(value["err"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn delete_echoes_name() {
    let h = Harness::new(
        FakeSource::repo(),
        FakeEngine::default(),
        FakeCluster::default().with_workload("svc"),
    );

    let (status, value) = send(h, Method::DELETE, "/build/svc", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value, json!({"image": "svc"}));
}

#[tokio::test]
async fn invalid_name_is_bad_request() {
    let h = Harness::default_repo();
    let cluster = h.cluster.clone();

    let (status, _) = send(h, Method::DELETE, "/build/Not_Valid", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(cluster.calls().is_empty());
}

#[tokio::test]
async fn dropped_connection_still_finishes_the_run() {
    let h = Harness::new(
        FakeSource::repo().with_file("kaas.service.yml", SERVICE_YAML),
        FakeEngine::default(),
        FakeCluster::default()
            .failing_service()
            .slow_service(Duration::from_millis(200)),
    );
    let cluster = h.cluster.clone();
    let router = create_router(Arc::new(h.pipeline));
    let body = json!({"repo_url": "https://example.com/repo.git"}).to_string();
    let request = Request::post("/build")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let dropped = tokio::time::timeout(Duration::from_millis(50), router.oneshot(request)).await;
    assert!(dropped.is_err());

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !cluster.calls().contains(&ClusterCall::Delete("svc".to_string())) {
        assert!(tokio::time::Instant::now() < deadline, "no compensating delete");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(!cluster.has_workload("svc"));
}
