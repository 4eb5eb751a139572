//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Tool registry is empty")]
    EmptyRegistry,

    #[error("Duplicate tool name in registry: {0}")]
    DuplicateTool(String),

    #[error("Tool name cannot be empty")]
    EmptyToolName,

    #[error("Tool '{tool}' depends on unknown tool '{dependency}'")]
    UnknownDependency { tool: String, dependency: String },

    #[error("Invalid task '{task_id}': {reason}")]
    InvalidTask { task_id: String, reason: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_error_display() {
        let error = DomainError::Cancelled;
        assert_eq!(error.to_string(), "Operation cancelled");
    }

    #[test]
    fn test_is_cancelled_check() {
        assert!(DomainError::Cancelled.is_cancelled());
        assert!(!DomainError::EmptyRegistry.is_cancelled());
        assert!(!DomainError::DuplicateTool("fetch".to_string()).is_cancelled());
    }

    #[test]
    fn test_unknown_dependency_display() {
        let error = DomainError::UnknownDependency {
            tool: "post".to_string(),
            dependency: "validate".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Tool 'post' depends on unknown tool 'validate'"
        );
    }
}
