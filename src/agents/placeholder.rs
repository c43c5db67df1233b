use super::error::{AgentError, AgentResult};
use super::AgentCapability;

/// Agent slot with nothing behind it. Every call fails with
/// [`AgentError::NotImplemented`], which surfaces as an ordinary agent error.
pub struct PlaceholderAgent;

impl AgentCapability for PlaceholderAgent {
    fn name(&self) -> &str {
        "placeholder"
    }

    fn invoke(&self, _input: &str) -> AgentResult<String> {
        Err(AgentError::NotImplemented(
            "no agent is wired into this deployment; set agent.provider = \"gemini\"".to_string(),
        ))
    }
}
