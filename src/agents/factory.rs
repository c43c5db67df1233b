use std::sync::Arc;

use secrecy::SecretString;
use tokio::runtime::Handle;

use super::error::{AgentError, AgentResult};
use super::gemini::GeminiAgent;
use super::placeholder::PlaceholderAgent;
use super::tools::{CurrentTimeTool, ToolRegistry};
use super::AgentCapability;
use crate::config::{AgentProviderType, AgentSettings};

/// Create an agent from configuration, reading the credential from the
/// environment variable named by `api_key_env`.
pub fn create_agent(settings: &AgentSettings) -> AgentResult<Arc<dyn AgentCapability>> {
    let api_key = std::env::var(&settings.api_key_env)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from);

    build_agent(settings, api_key)
}

/// Create an agent from configuration with an explicit credential
pub fn build_agent(
    settings: &AgentSettings,
    api_key: Option<SecretString>,
) -> AgentResult<Arc<dyn AgentCapability>> {
    match settings.provider {
        AgentProviderType::Placeholder => {
            tracing::warn!("Using placeholder agent; every chat request will fail");
            Ok(Arc::new(PlaceholderAgent))
        }
        AgentProviderType::Gemini => {
            let api_key = api_key.ok_or_else(|| {
                AgentError::Configuration(format!(
                    "{} is missing; set your API key in environment variables or .env",
                    settings.api_key_env
                ))
            })?;

            let runtime = Handle::try_current().map_err(|_| {
                AgentError::Configuration("Gemini agent must be built inside the tokio runtime".to_string())
            })?;

            let mut tools = ToolRegistry::new();
            if settings.enable_time_tool {
                tools.register(Arc::new(CurrentTimeTool));
            }

            tracing::info!(
                provider = %settings.provider,
                model = %settings.model,
                tools = ?tools.names(),
                "Constructed agent"
            );

            Ok(Arc::new(GeminiAgent::new(settings, api_key, tools, runtime)?))
        }
    }
}
