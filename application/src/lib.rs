//! Application layer for tooltrial
//!
//! This crate contains the episode controller, the provider call layer,
//! port definitions and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{EpisodeParams, RetryPolicy};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    deployment::{DeploymentManager, SingleDeployment},
    episode_progress::{EpisodeProgressNotifier, NoEpisodeProgress},
    provider_client::{ProviderClient, ProviderError, ProviderErrorKind, ProviderResponse},
    rate_gate::{NoRateGate, RateGate},
    tool_executor::ToolExecutorPort,
    tool_search::{ToolSearchError, ToolSearchPort},
};
pub use use_cases::provider_call::{ProviderCall, ProviderCallError, ProviderCaller};
pub use use_cases::run_episode::{RunEpisodeError, RunEpisodeInput, RunEpisodeUseCase};
