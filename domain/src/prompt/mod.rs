//! Prompt domain
//!
//! Templates for every message the engine writes into an episode's
//! conversation: system prompt, search and info answers, tool results and
//! nudges.

mod episode;

pub use episode::EpisodePromptTemplate;
