use super::common;

use chat_bridge::agents::{AgentError, AgentHandle};
use common::test_server::TestServer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn test_health_endpoint() {
    let server = TestServer::new(AgentHandle::with_agent(Arc::new(common::EchoAgent::new()))).await;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/health")).send().await.unwrap();

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["name"], "ABZ Agent API");
    assert_eq!(body["status"], "running");
}

#[tokio::test]
async fn test_health_does_not_touch_agent() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let handle = AgentHandle::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(AgentError::Configuration("GEMINI_API_KEY is missing".to_string()))
    });
    let server = TestServer::new(handle).await;
    let client = reqwest::Client::new();

    for _ in 0..3 {
        let response = client.get(server.url("/health")).send().await.unwrap();
        assert_eq!(response.status(), 200);
    }

    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_index_lists_routes() {
    let server = TestServer::new(AgentHandle::with_agent(Arc::new(common::EchoAgent::new()))).await;

    let body: serde_json::Value = reqwest::get(server.url("/"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["ok"], true);
    assert_eq!(body["routes"], serde_json::json!(["/health", "POST /v1/chat"]));
}
