//! Domain layer for tooltrial
//!
//! This crate contains the core logic of the tool-calling engine: entities,
//! value objects and pure functions. It has no dependencies on
//! infrastructure, async runtimes or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Episode
//!
//! An episode is one bounded multi-turn exchange between a model and a
//! simulated tool environment for a single task:
//!
//! - **Actions**: the model acts through `tool_search`, `tool_info` and
//!   `tool_call` tags ([`action`])
//! - **Feedback**: untagged or near-miss output gets corrective messages
//!   ([`feedback`])
//! - **Simulation**: tool outcomes are stochastic and dependency-aware
//!   ([`simulation`])
//! - **Grading**: the final state is graded FullSuccess, PartialSuccess or
//!   Failure ([`evaluation`])

pub mod action;
pub mod core;
pub mod episode;
pub mod evaluation;
pub mod feedback;
pub mod prompt;
pub mod simulation;
pub mod task;
pub mod tool;

// Re-export commonly used types
pub use action::{
    ActionCategory, COMPLETION_PHRASES, ParsedActions, ResolvedCalls, is_completion_signal,
    parse_actions, resolve_calls,
};
pub use core::error::DomainError;
pub use episode::{
    ApiIssue, ApiIssueKind, ChatMessage, EpisodeResult, EpisodeState, ErrorKind, Role,
    SearchLogEntry, TerminationReason, TurnRecord, TurnState, TurnTag,
};
pub use evaluation::{
    DEFAULT_PARTIAL_THRESHOLD, FailureClass, SuccessEvaluator, Verdict, VerdictKind,
    diagnostic_message,
};
pub use feedback::{ClassifierInput, FormatClassification, FormatIssue, classify, render_feedback};
pub use prompt::EpisodePromptTemplate;
pub use simulation::{DEFAULT_BASE_SUCCESS_RATE, ToolSimulator, success_probability};
pub use task::{TaskDefinition, TaskType};
pub use tool::{
    ExecutionMetadata, ToolCapability, ToolCategory, ToolErrorSpec, ToolExecutionResult,
    ToolFailure, ToolParameter, ToolRegistry, ToolReturn, ToolSearchHit,
};
