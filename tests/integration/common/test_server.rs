use chat_bridge::agents::{AgentHandle, InvocationBridge};
use chat_bridge::config::Settings;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
}

impl TestServer {
    pub async fn new(handle: AgentHandle) -> Self {
        Self::with_timeout(handle, Duration::from_secs(10)).await
    }

    pub async fn with_timeout(handle: AgentHandle, timeout: Duration) -> Self {
        let settings = Settings::default();
        let bridge = InvocationBridge::new(Arc::new(handle), timeout);
        let app = chat_bridge::create_app(&settings, bridge).unwrap();

        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer { addr, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
