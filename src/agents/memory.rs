//! In-process conversation memory shared by every invocation of one agent

use std::sync::Mutex;

use super::message::{AgentMessage, AgentRole};

/// Bounded transcript. Lost on restart.
pub struct ConversationMemory {
    messages: Mutex<Vec<AgentMessage>>,
    max_messages: usize,
}

impl ConversationMemory {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            max_messages,
        }
    }

    /// Copy of the current transcript
    pub fn snapshot(&self) -> Vec<AgentMessage> {
        self.lock().clone()
    }

    /// Append one completed turn and trim the oldest messages past the bound.
    ///
    /// After trimming the transcript always starts at a user message so the
    /// provider never sees an orphaned tool result or model reply.
    pub fn append_turn(&self, turn: Vec<AgentMessage>) {
        let mut messages = self.lock();
        messages.extend(turn);

        if messages.len() > self.max_messages {
            let remove_count = messages.len() - self.max_messages;
            messages.drain(0..remove_count);
        }

        let leading = messages
            .iter()
            .position(|m| m.role == AgentRole::User && !m.has_tool_calls())
            .unwrap_or(messages.len());
        messages.drain(0..leading);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<AgentMessage>> {
        // A panic mid-append leaves a valid Vec behind; keep serving it.
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }
}
