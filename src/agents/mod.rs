//! Agent capability and the machinery that bridges it into the server
//!
//! - `handle` - the process-wide, once-constructed agent instance
//! - `bridge` - runs the blocking `invoke` on the blocking pool under a timeout
//! - `factory` - builds an agent from [`AgentSettings`](crate::config::AgentSettings)
//! - `gemini` - Google Gemini backed agent with memory and tool calling
//! - `placeholder` - stub that reports it has not been implemented

pub mod bridge;
pub mod error;
pub mod factory;
pub mod gemini;
pub mod handle;
pub mod memory;
pub mod message;
pub mod placeholder;
pub mod tools;

pub use bridge::{FailureKind, InvocationBridge, InvocationOutcome};
pub use error::*;
pub use handle::AgentHandle;

use std::sync::atomic::AtomicBool;

/// An opaque conversational agent.
///
/// `invoke` is synchronous and may block for as long as the underlying
/// model takes; callers inside the async runtime must go through
/// [`InvocationBridge`]. Any state the agent keeps between calls (memory,
/// tool registrations) lives behind `&self`.
pub trait AgentCapability: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Produce a reply for a single input string
    fn invoke(&self, input: &str) -> AgentResult<String>;

    /// Like [`invoke`](Self::invoke), but `abandoned` turns true once the
    /// caller has stopped waiting for the reply. Agents that keep state
    /// between calls check it before committing the turn.
    fn invoke_abandonable(&self, input: &str, abandoned: &AtomicBool) -> AgentResult<String> {
        let _ = abandoned;
        self.invoke(input)
    }
}
