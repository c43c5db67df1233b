//! Process-wide agent instance

use std::sync::Arc;

use tokio::sync::OnceCell;

use super::error::{AgentError, AgentResult};
use super::factory;
use super::AgentCapability;
use crate::config::AgentSettings;

type AgentFactory = Box<dyn Fn() -> AgentResult<Arc<dyn AgentCapability>> + Send + Sync>;

/// Owns the single shared agent.
///
/// The factory runs at most once, even when many callers race on the first
/// [`get`](Self::get). Its outcome is kept for the life of the handle: a
/// construction failure is returned to every later caller and is never
/// retried.
pub struct AgentHandle {
    factory: AgentFactory,
    cell: OnceCell<Result<Arc<dyn AgentCapability>, String>>,
}

impl AgentHandle {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> AgentResult<Arc<dyn AgentCapability>> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            cell: OnceCell::new(),
        }
    }

    /// Handle that builds its agent from settings on first use
    pub fn from_settings(settings: AgentSettings) -> Self {
        Self::new(move || factory::create_agent(&settings))
    }

    /// Handle around an already constructed agent
    pub fn with_agent(agent: Arc<dyn AgentCapability>) -> Self {
        Self::new(move || Ok(agent.clone()))
    }

    /// Shared agent, constructing it on the first call
    pub async fn get(&self) -> AgentResult<Arc<dyn AgentCapability>> {
        let outcome = self
            .cell
            .get_or_init(|| async {
                match (self.factory)() {
                    Ok(agent) => {
                        tracing::info!(agent = agent.name(), "Agent ready");
                        Ok(agent)
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Agent construction failed");
                        Err(match e {
                            AgentError::Configuration(msg) => msg,
                            other => other.to_string(),
                        })
                    }
                }
            })
            .await;

        match outcome {
            Ok(agent) => Ok(agent.clone()),
            Err(msg) => Err(AgentError::Configuration(msg.clone())),
        }
    }

    /// Whether construction has been attempted, successfully or not
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}
