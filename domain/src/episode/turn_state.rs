//! States of the turn loop.

use serde::{Deserialize, Serialize};

/// Where the turn loop went after a model response.
///
/// Every turn starts in `AwaitingResponse` and moves to exactly one other
/// state, or stays there when the turn needed nothing but a nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    AwaitingResponse,
    Searching,
    InfoQuery,
    NoActionHelp,
    FormatHelp,
    ExecutingTools,
    Completed,
    Terminated,
}

impl TurnState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnState::AwaitingResponse => "awaiting_response",
            TurnState::Searching => "searching",
            TurnState::InfoQuery => "info_query",
            TurnState::NoActionHelp => "no_action_help",
            TurnState::FormatHelp => "format_help",
            TurnState::ExecutingTools => "executing_tools",
            TurnState::Completed => "completed",
            TurnState::Terminated => "terminated",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnState::Completed | TurnState::Terminated)
    }
}

impl std::fmt::Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
