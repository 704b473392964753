//! Integration tests for `GET /health` and cross-cutting HTTP behaviour.

use todont::config::StorageKind;

use super::test_helpers::{spawn_server, start};

#[tokio::test]
async fn health_reports_healthy_with_server_time() {
    let server = spawn_server(StorageKind::Memory).await;

    let resp = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .expect("GET /health");
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.expect("json");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["timestamp"], serde_json::to_value(start()).expect("json"));
}

#[tokio::test]
async fn cors_headers_are_present() {
    let server = spawn_server(StorageKind::Memory).await;

    let resp = server
        .client
        .get(server.url("/health"))
        .header("Origin", "http://localhost:5173")
        .send()
        .await
        .expect("GET /health");
    assert!(resp.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let server = spawn_server(StorageKind::Memory).await;

    let resp = server
        .client
        .get(server.url("/api/nothing-here"))
        .send()
        .await
        .expect("GET");
    assert_eq!(resp.status(), 404);
}
