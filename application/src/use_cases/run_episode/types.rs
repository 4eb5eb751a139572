//! Type definitions for the RunEpisode use case.

use std::sync::Arc;
use thiserror::Error;
use tooltrial_domain::{DomainError, TaskDefinition, ToolRegistry};

/// Errors that prevent an episode from producing a result.
///
/// Provider failures, tool failures and malformed output are not errors:
/// they end up in the [`EpisodeResult`](tooltrial_domain::EpisodeResult).
#[derive(Error, Debug)]
pub enum RunEpisodeError {
    #[error("Invalid episode input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunEpisodeError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunEpisodeError::Cancelled)
    }
}

/// Input for the RunEpisode use case
#[derive(Debug, Clone)]
pub struct RunEpisodeInput {
    pub task: TaskDefinition,
    pub registry: Arc<ToolRegistry>,
    /// Logical model name; the deployment manager maps it to a deployment
    pub model: String,
}

impl RunEpisodeInput {
    pub fn new(task: TaskDefinition, registry: Arc<ToolRegistry>, model: impl Into<String>) -> Self {
        Self {
            task,
            registry,
            model: model.into(),
        }
    }
}
