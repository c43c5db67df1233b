//! Google Gemini backed agent
//!
//! Keeps an in-process transcript across invocations and lets the model call
//! registered tools for up to `max_iterations` round-trips per invocation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::runtime::Handle;

use super::error::{AgentError, AgentResult, LlmError, LlmResult};
use super::memory::ConversationMemory;
use super::message::{AgentMessage, AgentRole};
use super::tools::{ToolCall, ToolRegistry};
use super::AgentCapability;
use crate::config::AgentSettings;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are the ABZ Website Chatbot. \
Be concise, helpful, and friendly. \
Use the 'current_time' tool when the user asks for time in a specific timezone. \
Do NOT reveal internal JSON/tool calls; return final answers only. \
ABZ Agent SDK is a toolkit for building AI agents on top of Gemini: \
load an API key and an agent with tools and memory is ready to go.";

/// Gemini agent
pub struct GeminiAgent {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    system_prompt: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    max_iterations: u32,
    tools: ToolRegistry,
    memory: ConversationMemory,
    runtime: Handle,
}

impl GeminiAgent {
    /// Create a Gemini agent. `runtime` drives the HTTP calls made from
    /// inside the blocking `invoke`.
    pub fn new(
        settings: &AgentSettings,
        api_key: SecretString,
        tools: ToolRegistry,
        runtime: Handle,
    ) -> AgentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_seconds))
            .build()
            .map_err(|e| AgentError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = settings
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            api_key,
            base_url,
            model: settings.model.clone(),
            system_prompt: settings.system_prompt.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            max_iterations: settings.max_iterations,
            tools,
            memory: ConversationMemory::new(settings.memory_max_messages),
            runtime,
        })
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// One user turn: model round-trips with tool execution until the model
    /// answers in plain text.
    pub async fn run(&self, input: &str) -> AgentResult<String> {
        self.turn(input, None).await
    }

    /// Runs one turn. A turn whose caller has gone away by the time the
    /// model answers is not committed to memory.
    async fn turn(&self, input: &str, abandoned: Option<&AtomicBool>) -> AgentResult<String> {
        let mut transcript = self.memory.snapshot();
        let turn_start = transcript.len();
        transcript.push(AgentMessage::user(input));

        for iteration in 0..self.max_iterations {
            let reply = self.complete(&transcript).await?;

            if !reply.has_tool_calls() {
                if reply.content.trim().is_empty() {
                    return Err(AgentError::Execution("Model returned an empty reply".to_string()));
                }
                let text = reply.content.clone();
                transcript.push(reply);
                if abandoned.map_or(false, |a| a.load(Ordering::SeqCst)) {
                    tracing::debug!("Caller stopped waiting; turn not kept in memory");
                } else {
                    self.memory.append_turn(transcript.split_off(turn_start));
                }
                return Ok(text);
            }

            let calls = reply.tool_calls.clone().unwrap_or_default();
            transcript.push(reply);
            for call in &calls {
                tracing::debug!(tool = %call.name, iteration, "Model requested tool");
                let result = self.tools.execute(call);
                transcript.push(AgentMessage::tool_result(call, &result));
            }
        }

        Err(AgentError::MaxIterations(self.max_iterations))
    }

    async fn complete(&self, messages: &[AgentMessage]) -> LlmResult<AgentMessage> {
        let body = self.build_request_body(messages);
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %error_text, "Gemini request failed");
            return Err(match status.as_u16() {
                401 | 403 => LlmError::Authentication(format!("provider rejected credentials ({})", status)),
                code => LlmError::Api { status: code },
            });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(format!("Failed to parse response: {}", e.without_url())))?;

        parse_response(gemini_response)
    }

    /// Build the request body for Gemini API
    fn build_request_body(&self, messages: &[AgentMessage]) -> Value {
        let mut body = json!({
            "contents": convert_messages(messages),
        });

        if !self.system_prompt.is_empty() {
            body["systemInstruction"] = json!({
                "parts": [{ "text": self.system_prompt }]
            });
        }

        let mut generation_config = json!({});
        if let Some(temp) = self.temperature {
            generation_config["temperature"] = json!(temp);
        }
        if let Some(max_tokens) = self.max_tokens {
            generation_config["maxOutputTokens"] = json!(max_tokens);
        }
        if generation_config.as_object().map_or(false, |o| !o.is_empty()) {
            body["generationConfig"] = generation_config;
        }

        if !self.tools.is_empty() {
            body["tools"] = json!([{
                "function_declarations": self.tools.definitions().iter().map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters
                    })
                }).collect::<Vec<_>>()
            }]);
        }

        body
    }
}

impl AgentCapability for GeminiAgent {
    fn name(&self) -> &str {
        "gemini"
    }

    /// Blocks the calling thread until the turn completes. Must not be called
    /// from an async worker thread.
    fn invoke(&self, input: &str) -> AgentResult<String> {
        self.runtime.block_on(self.run(input))
    }

    fn invoke_abandonable(&self, input: &str, abandoned: &AtomicBool) -> AgentResult<String> {
        self.runtime.block_on(self.turn(input, Some(abandoned)))
    }
}

/// Convert transcript messages to Gemini `contents`
fn convert_messages(messages: &[AgentMessage]) -> Vec<Value> {
    let mut contents = Vec::new();

    for m in messages {
        match m.role {
            AgentRole::User => {
                contents.push(json!({
                    "role": "user",
                    "parts": [{ "text": m.content }]
                }));
            }
            AgentRole::Assistant => {
                let mut parts = Vec::new();

                if !m.content.is_empty() {
                    parts.push(json!({ "text": m.content }));
                }

                if let Some(tool_calls) = &m.tool_calls {
                    for tc in tool_calls {
                        parts.push(json!({
                            "functionCall": {
                                "name": tc.name,
                                "args": tc.arguments
                            }
                        }));
                    }
                }

                if !parts.is_empty() {
                    contents.push(json!({
                        "role": "model",
                        "parts": parts
                    }));
                }
            }
            AgentRole::Tool => {
                let tool_name = m.name.clone().unwrap_or_else(|| "tool".to_string());
                let response_value: Value = serde_json::from_str(&m.content)
                    .unwrap_or_else(|_| json!({ "result": m.content }));

                contents.push(json!({
                    "role": "user",
                    "parts": [{
                        "functionResponse": {
                            "name": tool_name,
                            "response": response_value
                        }
                    }]
                }));
            }
        }
    }

    contents
}

fn parse_response(response: GeminiResponse) -> LlmResult<AgentMessage> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Parse("No candidates in response".to_string()))?;

    let mut content = String::new();
    let mut tool_calls = Vec::new();

    let parts = candidate.content.and_then(|c| c.parts).unwrap_or_default();
    for (index, part) in parts.into_iter().enumerate() {
        if let Some(text) = part.text {
            content.push_str(&text);
        }
        if let Some(fc) = part.function_call {
            tool_calls.push(ToolCall::new(
                format!("call_{}", index),
                fc.name,
                fc.args.unwrap_or(Value::Object(Default::default())),
            ));
        }
    }

    let filtered = matches!(
        candidate.finish_reason.as_deref(),
        Some("SAFETY") | Some("RECITATION") | Some("PROHIBITED_CONTENT")
    );
    if filtered && content.is_empty() && tool_calls.is_empty() {
        return Err(LlmError::ContentFiltered);
    }

    Ok(AgentMessage::assistant_with_tools(content, tool_calls))
}

// Gemini API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiFunctionCall {
    name: String,
    args: Option<Value>,
}
