//! Error types for the agent layer

use thiserror::Error;

/// Errors that can occur while constructing or invoking an agent
#[derive(Debug, Error)]
pub enum AgentError {
    /// Required configuration (usually a provider credential) is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Tool execution error
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// The capability has no implementation behind it yet
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Max iterations reached
    #[error("Max iterations ({0}) reached without completion")]
    MaxIterations(u32),

    /// Execution error
    #[error("Execution error: {0}")]
    Execution(String),
}

/// Errors specific to LLM provider operations
#[derive(Debug, Error)]
pub enum LlmError {
    /// Non-success status. The provider body is logged where the response
    /// is read and never carried in the error.
    #[error("API error: status {status}")]
    Api { status: u16 },

    /// Authentication error
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Content filtered
    #[error("Content filtered by safety system")]
    ContentFiltered,

    /// Timeout
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest errors carry the request URL, which holds the API key
        let err = err.without_url();
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_connect() {
            LlmError::Network(format!("Connection error: {}", err))
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

/// Result type alias for agent operations
pub type AgentResult<T> = Result<T, AgentError>;

/// Result type alias for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_shows_status_only() {
        let err = AgentError::from(LlmError::Api { status: 400 });
        assert_eq!(err.to_string(), "LLM error: API error: status 400");
    }

    #[test]
    fn test_not_implemented_display() {
        let err = AgentError::NotImplemented("wire the agent".to_string());
        assert_eq!(err.to_string(), "Not implemented: wire the agent");
    }
}
