//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod deployment;
pub mod episode_progress;
pub mod provider_client;
pub mod rate_gate;
pub mod tool_executor;
pub mod tool_search;
