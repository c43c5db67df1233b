#![allow(dead_code)]

pub mod test_server;

use chat_bridge::agents::{AgentCapability, AgentError, AgentResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Replies with its input, optionally after a delay
pub struct EchoAgent {
    pub delay: Duration,
    pub calls: Arc<AtomicUsize>,
}

impl EchoAgent {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl AgentCapability for EchoAgent {
    fn name(&self) -> &str {
        "echo"
    }

    fn invoke(&self, input: &str) -> AgentResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        Ok(format!("echo: {}", input))
    }
}

pub struct FailingAgent;

impl AgentCapability for FailingAgent {
    fn name(&self) -> &str {
        "failing"
    }

    fn invoke(&self, _input: &str) -> AgentResult<String> {
        Err(AgentError::Execution("upstream exploded".to_string()))
    }
}

pub struct PanickingAgent;

impl AgentCapability for PanickingAgent {
    fn name(&self) -> &str {
        "panicking"
    }

    fn invoke(&self, _input: &str) -> AgentResult<String> {
        panic!("boom")
    }
}
