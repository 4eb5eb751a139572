//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording episode events
//! (model responses, tool results, corrective feedback, provider issues,
//! the final verdict) to a structured transcript.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! episode transcript in a machine-readable format (JSONL).

use serde_json::Value;

/// Event type: a model response for one turn.
pub const LLM_RESPONSE: &str = "llm_response";
/// Event type: one tool execution result.
pub const TOOL_RESULT: &str = "tool_result";
/// Event type: corrective feedback appended after a malformed turn.
pub const FORMAT_FEEDBACK: &str = "format_feedback";
/// Event type: a classified provider problem.
pub const API_ISSUE: &str = "api_issue";
/// Event type: the graded end of an episode.
pub const EPISODE_END: &str = "episode_end";

/// A structured conversation event for logging.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The adapter adds the timestamp.
pub struct ConversationEvent {
    /// Event type identifier (one of the constants in this module).
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging conversation events to a structured log.
///
/// The `log` method is synchronous and non-fallible; logging failures are
/// ignored by implementations.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
