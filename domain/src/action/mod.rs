//! Structured actions extracted from raw model text.
//!
//! The model drives an episode with three tags:
//!
//! | Tag | Meaning |
//! |-----|---------|
//! | `<tool_search>QUERY</tool_search>` | find tools matching free text |
//! | `<tool_info>NAME</tool_info>` | show the full descriptor of a tool |
//! | `<tool_call>NAME</tool_call>` | execute a tool |
//!
//! and ends it with a completion phrase (see [`completion`]).

pub mod completion;
pub mod parser;

pub use completion::{COMPLETION_PHRASES, is_completion_signal};
pub use parser::{ActionCategory, ParsedActions, ResolvedCalls, parse_actions, resolve_calls};
