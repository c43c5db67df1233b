//! Tools the agent can call while answering

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::{AgentError, AgentResult};

/// A tool call made by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier for this tool call
    pub id: String,
    /// Name of the tool being called
    pub name: String,
    /// Arguments passed to the tool (as JSON)
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Declaration sent to the model so it knows the tool exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments
    pub parameters: Value,
}

/// A synchronous tool
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    fn call(&self, arguments: &Value) -> AgentResult<Value>;
}

/// Tools registered with an agent, keyed by name
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name;
        tracing::debug!(tool = %name, "Registered tool");
        self.tools.insert(name, tool);
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Run a call and shape the outcome for the model. Failures are reported
    /// back to the model as `{"error": ...}` rather than aborting the turn.
    pub fn execute(&self, call: &ToolCall) -> Value {
        let result = match self.tools.get(&call.name) {
            Some(tool) => tool.call(&call.arguments),
            None => Err(AgentError::ToolExecution(format!("Unknown tool: {}", call.name))),
        };

        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool call failed");
                json!({ "error": e.to_string() })
            }
        }
    }
}

const INVALID_TIMEZONE: &str = "Invalid timezone. Try 'UTC' or 'America/Los_Angeles'.";

/// Returns the current time in a requested zone
pub struct CurrentTimeTool;

impl Tool for CurrentTimeTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "current_time".to_string(),
            description: "Return current time in the given timezone (e.g. 'UTC', 'UTC+2', '-05:00').".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "tz": {
                        "type": "string",
                        "description": "Timezone, defaults to UTC"
                    }
                }
            }),
        }
    }

    fn call(&self, arguments: &Value) -> AgentResult<Value> {
        let tz = arguments.get("tz").and_then(|v| v.as_str()).unwrap_or("UTC");
        Ok(json!({ "result": format_time(Utc::now(), tz) }))
    }
}

/// Formats `now` in zone `tz` as `YYYY-mm-dd HH:MM:SS <zone>`
pub fn format_time(now: DateTime<Utc>, tz: &str) -> String {
    match parse_zone(tz) {
        Some((offset, label)) => format!(
            "{} {}",
            now.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S"),
            label
        ),
        None => INVALID_TIMEZONE.to_string(),
    }
}

/// Accepts `UTC`, `GMT`, `Z` and fixed offsets such as `+05:30`, `UTC-8`, `GMT+0100`.
fn parse_zone(tz: &str) -> Option<(FixedOffset, String)> {
    let tz = tz.trim();
    let upper = tz.to_ascii_uppercase();

    if matches!(upper.as_str(), "UTC" | "GMT" | "Z" | "ETC/UTC") {
        return FixedOffset::east_opt(0).map(|o| (o, "UTC".to_string()));
    }

    let rest = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(&upper);

    let (sign, digits) = match rest.chars().next()? {
        '+' => (1, &rest[1..]),
        '-' => (-1, &rest[1..]),
        _ => return None,
    };

    // Byte-index splitting below needs ASCII
    if !digits.is_ascii() {
        return None;
    }

    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() > 2 => digits.split_at(digits.len() - 2),
        None => (digits, "0"),
    };

    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(hours) || !all_digits(minutes) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }

    let seconds = sign * (hours * 3600 + minutes * 60);
    let offset = FixedOffset::east_opt(seconds)?;
    let label = format!(
        "UTC{}{:02}:{:02}",
        if sign < 0 { '-' } else { '+' },
        hours,
        minutes
    );
    Some((offset, label))
}
