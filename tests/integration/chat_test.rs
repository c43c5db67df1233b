use super::common;

use chat_bridge::agents::AgentHandle;
use common::test_server::TestServer;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

async fn post_chat(client: &reqwest::Client, server: &TestServer, body: Value) -> (u16, Value) {
    let response = client
        .post(server.url("/v1/chat"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_chat_round_trip() {
    let agent = Arc::new(common::EchoAgent::new());
    let calls = agent.calls.clone();
    let server = TestServer::new(AgentHandle::with_agent(agent)).await;
    let client = reqwest::Client::new();

    let (status, body) = post_chat(
        &client,
        &server,
        json!({
            "messages": [
                {"role": "user", "content": "first"},
                {"role": "assistant", "content": "answer"},
                {"role": "user", "content": "second"}
            ]
        }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"message": {"role": "assistant", "content": "echo: second"}})
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_error_envelope_over_http() {
    let server = TestServer::new(AgentHandle::with_agent(Arc::new(common::FailingAgent))).await;
    let client = reqwest::Client::new();

    let (status, body) = post_chat(
        &client,
        &server,
        json!({"messages": [{"role": "user", "content": "hi"}]}),
    )
    .await;

    assert_eq!(status, 500);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Agent Error: "), "{}", detail);
    assert!(detail.contains("upstream exploded"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_requests_are_paired_correctly() {
    let agent = Arc::new(common::EchoAgent::with_delay(Duration::from_millis(300)));
    let server = TestServer::new(AgentHandle::with_agent(agent)).await;
    let client = reqwest::Client::new();

    let started = Instant::now();
    let requests = (0..8).map(|i| {
        let client = client.clone();
        let server = &server;
        async move {
            let (status, body) = post_chat(
                &client,
                server,
                json!({"messages": [{"role": "user", "content": format!("request {}", i)}]}),
            )
            .await;
            (i, status, body)
        }
    });
    let results = futures::future::join_all(requests).await;

    for (i, status, body) in results {
        assert_eq!(status, 200);
        assert_eq!(body["message"]["content"], format!("echo: request {}", i));
    }
    // Eight sequential calls would take 2.4s
    assert!(started.elapsed() < Duration::from_millis(2000));
}

#[tokio::test]
async fn test_health_stays_responsive_while_agent_is_busy() {
    let agent = Arc::new(common::EchoAgent::with_delay(Duration::from_millis(800)));
    let server = TestServer::new(AgentHandle::with_agent(agent)).await;
    let client = reqwest::Client::new();

    let slow = {
        let client = client.clone();
        let url = server.url("/v1/chat");
        tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({"messages": [{"role": "user", "content": "slow"}]}))
                .send()
                .await
                .unwrap()
                .status()
        })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    let started = Instant::now();
    let response = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(started.elapsed() < Duration::from_millis(500));

    assert_eq!(slow.await.unwrap(), 200);
}

#[tokio::test]
async fn test_timeout_over_http() {
    let agent = Arc::new(common::EchoAgent::with_delay(Duration::from_millis(500)));
    let server = TestServer::with_timeout(AgentHandle::with_agent(agent), Duration::from_millis(50)).await;
    let client = reqwest::Client::new();

    let (status, body) = post_chat(
        &client,
        &server,
        json!({"messages": [{"role": "user", "content": "hi"}]}),
    )
    .await;

    assert_eq!(status, 504);
    assert!(body["detail"].as_str().unwrap().starts_with("Agent Timeout: "));
}
