use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod validator;

use crate::agents::gemini::DEFAULT_SYSTEM_PROMPT;
use crate::cli::Cli;

/// Prefix for environment overrides, e.g. `CHAT_BRIDGE__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "CHAT_BRIDGE";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub cors: CorsSettings,
    #[serde(default)]
    pub agent: AgentSettings,
    #[serde(default)]
    pub bridge: BridgeSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppSettings {
    /// Reported by `/health`
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Free-form deployment name (dev, staging, prod)
    #[serde(default = "default_env")]
    pub env: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            env: default_env(),
        }
    }
}

fn default_app_name() -> String {
    "ABZ Agent API".to_string()
}

fn default_env() -> String {
    std::env::var("ENV").unwrap_or_else(|_| "dev".to_string())
}

/// Which browser origins may call the API.
///
/// An origin is allowed when it equals one of `allow_origins` or matches
/// `allow_origin_regex`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsSettings {
    #[serde(default = "default_allow_origins")]
    pub allow_origins: Vec<String>,
    #[serde(default = "default_allow_origin_regex")]
    pub allow_origin_regex: Option<String>,
    #[serde(default = "default_true")]
    pub allow_credentials: bool,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allow_origins: default_allow_origins(),
            allow_origin_regex: default_allow_origin_regex(),
            allow_credentials: true,
        }
    }
}

fn default_allow_origins() -> Vec<String> {
    let mut origins = vec!["http://localhost:3000".to_string()];
    if let Ok(site) = std::env::var("NEXT_PUBLIC_SITE_URL") {
        if !site.is_empty() && !origins.contains(&site) {
            origins.insert(0, site);
        }
    }
    origins
}

fn default_allow_origin_regex() -> Option<String> {
    Some(r"^https://.*\.vercel\.app$".to_string())
}

fn default_true() -> bool {
    true
}

/// Agent backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentProviderType {
    /// Google Gemini
    #[default]
    #[serde(alias = "google")]
    Gemini,
    /// Stub that fails every invocation with a not-implemented error
    Placeholder,
}

impl std::fmt::Display for AgentProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentProviderType::Gemini => write!(f, "gemini"),
            AgentProviderType::Placeholder => write!(f, "placeholder"),
        }
    }
}

/// Configuration for the agent capability
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentSettings {
    #[serde(default)]
    pub provider: AgentProviderType,
    /// Model name/identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable containing the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Custom base URL (for proxied endpoints and tests)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Upper bound on model round-trips per invocation (tool calls included)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Messages the agent keeps across invocations
    #[serde(default = "default_memory_max_messages")]
    pub memory_max_messages: usize,
    /// Register the `current_time` tool
    #[serde(default = "default_true")]
    pub enable_time_tool: bool,
    /// HTTP timeout for a single provider call
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            provider: AgentProviderType::default(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            base_url: None,
            system_prompt: default_system_prompt(),
            max_iterations: default_max_iterations(),
            temperature: None,
            max_tokens: None,
            memory_max_messages: default_memory_max_messages(),
            enable_time_tool: true,
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_max_iterations() -> u32 {
    3
}

fn default_memory_max_messages() -> usize {
    50
}

fn default_request_timeout() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BridgeSettings {
    /// Bound on how long a request waits for the agent
    #[serde(default = "default_bridge_timeout")]
    pub timeout_seconds: u64,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: default_bridge_timeout(),
        }
    }
}

fn default_bridge_timeout() -> u64 {
    120
}

impl Settings {
    /// Create settings from CLI arguments (config file, environment, then CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(&cli.config)?;

        if let Some(host) = &cli.host {
            settings.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            settings.server.port = port;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from an optional config file plus environment
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let settings = Self::load(path)?;
        settings.validate()?;
        Ok(settings)
    }

    fn load(path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }
}
