use super::{Message, Role};

/// Picks the text handed to the agent: the newest user message, or the last
/// message of any role when the conversation has no user turn.
///
/// Returns `None` only for an empty conversation, which validation rejects
/// before selection runs.
pub fn select_input(messages: &[Message]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .or_else(|| messages.last())
        .map(|m| m.content.as_str())
}
