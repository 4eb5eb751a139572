//! Episode: one full run of the turn loop for a single task.
//!
//! - [`EpisodeState`]: append-only histories, counters and flags
//! - [`TurnRecord`] / [`ChatMessage`]: conversation bookkeeping
//! - [`EpisodeResult`]: what the caller receives once grading is done

pub mod conversation;
pub mod result;
pub mod state;
pub mod turn_state;

pub use conversation::{ChatMessage, Role, TurnRecord, TurnTag};
pub use result::{EpisodeResult, ErrorKind, TerminationReason};
pub use state::{ApiIssue, ApiIssueKind, EpisodeState, SearchLogEntry};
pub use turn_state::TurnState;
