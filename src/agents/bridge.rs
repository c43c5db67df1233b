//! Runs blocking agent calls off the request-handling threads

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use super::handle::AgentHandle;

/// Why an invocation produced no text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The agent raised an error, panicked, or could not be constructed
    AgentError,
    /// The agent did not answer within the bridge timeout
    Timeout,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::AgentError => write!(f, "agent_error"),
            FailureKind::Timeout => write!(f, "timeout"),
        }
    }
}

/// Normalized result of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    Success { text: String },
    Failure { kind: FailureKind, message: String },
}

impl InvocationOutcome {
    fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        InvocationOutcome::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success { .. })
    }
}

/// Moves each invocation onto tokio's blocking pool and waits for it under
/// a timeout. Exactly one attempt is made per call.
#[derive(Clone)]
pub struct InvocationBridge {
    handle: Arc<AgentHandle>,
    timeout: Duration,
}

impl InvocationBridge {
    pub fn new(handle: Arc<AgentHandle>, timeout: Duration) -> Self {
        Self { handle, timeout }
    }

    /// Invoke the shared agent with `input`.
    ///
    /// Never panics and never returns a raw error: every path ends in an
    /// [`InvocationOutcome`]. On timeout the worker is left to finish on its
    /// own and its result is dropped; the agent is told through
    /// [`AgentCapability::invoke_abandonable`](super::AgentCapability::invoke_abandonable)
    /// so it can skip committing the turn.
    pub async fn invoke(&self, input: String) -> InvocationOutcome {
        let agent = match self.handle.get().await {
            Ok(agent) => agent,
            Err(e) => return InvocationOutcome::failure(FailureKind::AgentError, e.to_string()),
        };

        let started = Instant::now();
        let abandoned = Arc::new(AtomicBool::new(false));
        let task = tokio::task::spawn_blocking({
            let abandoned = abandoned.clone();
            move || agent.invoke_abandonable(&input, &abandoned)
        });

        let outcome = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(Ok(text))) => InvocationOutcome::Success { text },
            Ok(Ok(Err(e))) => InvocationOutcome::failure(FailureKind::AgentError, e.to_string()),
            Ok(Err(join_err)) => {
                tracing::error!(error = %join_err, "Agent worker did not complete");
                let message = if join_err.is_panic() {
                    "agent panicked"
                } else {
                    "agent task was cancelled"
                };
                InvocationOutcome::failure(FailureKind::AgentError, message)
            }
            Err(_) => {
                abandoned.store(true, Ordering::SeqCst);
                InvocationOutcome::failure(
                    FailureKind::Timeout,
                    format!("agent did not respond within {:?}", self.timeout),
                )
            }
        };

        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            success = outcome.is_success(),
            "Invocation finished"
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::error::{AgentError, AgentResult};
    use crate::agents::AgentCapability;

    struct Scripted {
        delay: Duration,
        reply: fn(&str) -> AgentResult<String>,
    }

    impl AgentCapability for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn invoke(&self, input: &str) -> AgentResult<String> {
            std::thread::sleep(self.delay);
            (self.reply)(input)
        }
    }

    fn bridge_for(agent: Scripted, timeout: Duration) -> InvocationBridge {
        InvocationBridge::new(Arc::new(AgentHandle::with_agent(Arc::new(agent))), timeout)
    }

    #[tokio::test]
    async fn test_success() {
        let bridge = bridge_for(
            Scripted {
                delay: Duration::ZERO,
                reply: |input| Ok(format!("echo: {}", input)),
            },
            Duration::from_secs(5),
        );

        assert_eq!(
            bridge.invoke("hi".to_string()).await,
            InvocationOutcome::Success {
                text: "echo: hi".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_agent_error_is_normalized() {
        let bridge = bridge_for(
            Scripted {
                delay: Duration::ZERO,
                reply: |_| Err(AgentError::NotImplemented("later".to_string())),
            },
            Duration::from_secs(5),
        );

        assert_eq!(
            bridge.invoke("hi".to_string()).await,
            InvocationOutcome::Failure {
                kind: FailureKind::AgentError,
                message: "Not implemented: later".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let bridge = bridge_for(
            Scripted {
                delay: Duration::ZERO,
                reply: |_| panic!("boom at agent.rs:42"),
            },
            Duration::from_secs(5),
        );

        match bridge.invoke("hi".to_string()).await {
            InvocationOutcome::Failure { kind, message } => {
                assert_eq!(kind, FailureKind::AgentError);
                assert_eq!(message, "agent panicked");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout() {
        let bridge = bridge_for(
            Scripted {
                delay: Duration::from_millis(500),
                reply: |_| Ok("late".to_string()),
            },
            Duration::from_millis(50),
        );

        match bridge.invoke("hi".to_string()).await {
            InvocationOutcome::Failure { kind, message } => {
                assert_eq!(kind, FailureKind::Timeout);
                assert_eq!(message, "agent did not respond within 50ms");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    /// Reports whether it was abandoned by the time its work finished
    struct Observer {
        delay: Duration,
        saw_abandoned: Arc<AtomicBool>,
    }

    impl AgentCapability for Observer {
        fn name(&self) -> &str {
            "observer"
        }

        fn invoke(&self, _input: &str) -> AgentResult<String> {
            Ok("done".to_string())
        }

        fn invoke_abandonable(&self, input: &str, abandoned: &AtomicBool) -> AgentResult<String> {
            std::thread::sleep(self.delay);
            self.saw_abandoned.store(abandoned.load(Ordering::SeqCst), Ordering::SeqCst);
            self.invoke(input)
        }
    }

    #[tokio::test]
    async fn test_timeout_marks_worker_abandoned() {
        let saw_abandoned = Arc::new(AtomicBool::new(false));
        let agent = Observer {
            delay: Duration::from_millis(200),
            saw_abandoned: saw_abandoned.clone(),
        };
        let bridge = InvocationBridge::new(
            Arc::new(AgentHandle::with_agent(Arc::new(agent))),
            Duration::from_millis(20),
        );

        let outcome = bridge.invoke("hi".to_string()).await;
        assert!(matches!(outcome, InvocationOutcome::Failure { kind: FailureKind::Timeout, .. }));

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(saw_abandoned.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_completed_worker_is_not_abandoned() {
        let saw_abandoned = Arc::new(AtomicBool::new(true));
        let agent = Observer {
            delay: Duration::ZERO,
            saw_abandoned: saw_abandoned.clone(),
        };
        let bridge = InvocationBridge::new(
            Arc::new(AgentHandle::with_agent(Arc::new(agent))),
            Duration::from_secs(5),
        );

        assert!(bridge.invoke("hi".to_string()).await.is_success());
        assert!(!saw_abandoned.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_construction_failure_becomes_agent_error() {
        let handle = AgentHandle::new(|| Err(AgentError::Configuration("no key".to_string())));
        let bridge = InvocationBridge::new(Arc::new(handle), Duration::from_secs(1));

        assert_eq!(
            bridge.invoke("hi".to_string()).await,
            InvocationOutcome::Failure {
                kind: FailureKind::AgentError,
                message: "Configuration error: no key".to_string()
            }
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_slow_agent_does_not_block_runtime() {
        let bridge = bridge_for(
            Scripted {
                delay: Duration::from_millis(300),
                reply: |_| Ok("slow".to_string()),
            },
            Duration::from_secs(5),
        );

        let pending = tokio::spawn({
            let bridge = bridge.clone();
            async move { bridge.invoke("a".to_string()).await }
        });

        // The single runtime thread stays free while the agent sleeps.
        let started = Instant::now();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(started.elapsed() < Duration::from_millis(200));
        assert!(!pending.is_finished());

        assert!(pending.await.unwrap().is_success());
    }
}
