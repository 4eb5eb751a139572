//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod provider_call;
pub mod run_episode;
pub(crate) mod shared;
