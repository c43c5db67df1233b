use thiserror::Error;

use crate::config::{AgentSettings, BridgeSettings, CorsSettings, ServerSettings, Settings};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();

        errors.extend(Self::validate_server(&settings.server));
        errors.extend(Self::validate_cors(&settings.cors));
        errors.extend(Self::validate_agent(&settings.agent));
        errors.extend(Self::validate_bridge(&settings.bridge));

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &ServerSettings) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if server.host.is_empty() {
            errors.push(ConfigError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        errors
    }

    fn validate_cors(cors: &CorsSettings) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (idx, origin) in cors.allow_origins.iter().enumerate() {
            if origin.is_empty() || origin == "*" {
                errors.push(ConfigError::InvalidValue {
                    field: format!("cors.allow_origins[{}]", idx),
                    reason: "Origins must be explicit; use allow_origin_regex for patterns".to_string(),
                });
            }
        }

        if let Some(pattern) = &cors.allow_origin_regex {
            if let Err(e) = regex::Regex::new(pattern) {
                errors.push(ConfigError::InvalidValue {
                    field: "cors.allow_origin_regex".to_string(),
                    reason: e.to_string(),
                });
            }
        }

        errors
    }

    fn validate_agent(agent: &AgentSettings) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if agent.model.is_empty() {
            errors.push(ConfigError::MissingField("agent.model".to_string()));
        }

        if agent.api_key_env.is_empty() {
            errors.push(ConfigError::MissingField("agent.api_key_env".to_string()));
        }

        if agent.max_iterations == 0 {
            errors.push(ConfigError::InvalidValue {
                field: "agent.max_iterations".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if agent.memory_max_messages == 0 {
            errors.push(ConfigError::InvalidValue {
                field: "agent.memory_max_messages".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if let Some(temp) = agent.temperature {
            if !(0.0..=2.0).contains(&temp) {
                errors.push(ConfigError::InvalidValue {
                    field: "agent.temperature".to_string(),
                    reason: format!("{} is outside 0.0..=2.0", temp),
                });
            }
        }

        errors
    }

    fn validate_bridge(bridge: &BridgeSettings) -> Vec<ConfigError> {
        if bridge.timeout_seconds == 0 {
            vec![ConfigError::InvalidValue {
                field: "bridge.timeout_seconds".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            }]
        } else {
            Vec::new()
        }
    }
}
