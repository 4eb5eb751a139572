//! Provider client port
//!
//! Defines the interface for sending a conversation to a remote
//! text-completion model. Failures are classified by the adapter so the
//! provider call layer can decide between retry, failover and abort.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tooltrial_domain::{ApiIssueKind, ChatMessage};

/// Classification of a failed provider request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// The request exceeded its timeout. Never retried.
    Timeout,
    /// 429-class throttling; a deployment failover may help
    RateLimited,
    /// The provider rejected the request (400-class)
    InvalidRequest,
    /// Network or server-side failure (connect errors, 5xx)
    Connection,
    Other,
}

impl ProviderErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderErrorKind::Timeout => "timeout",
            ProviderErrorKind::RateLimited => "rate_limited",
            ProviderErrorKind::InvalidRequest => "invalid_request",
            ProviderErrorKind::Connection => "connection",
            ProviderErrorKind::Other => "other",
        }
    }

    pub fn is_retryable(&self) -> bool {
        !matches!(self, ProviderErrorKind::Timeout)
    }

    /// Issue-log kind for this failure.
    pub fn issue_kind(&self) -> ApiIssueKind {
        match self {
            ProviderErrorKind::Timeout => ApiIssueKind::Timeout,
            ProviderErrorKind::RateLimited => ApiIssueKind::RateLimited,
            ProviderErrorKind::InvalidRequest => ApiIssueKind::InvalidRequest,
            ProviderErrorKind::Connection => ApiIssueKind::Connection,
            ProviderErrorKind::Other => ApiIssueKind::Other,
        }
    }
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A classified provider failure
#[derive(Error, Debug, Clone)]
#[error("{kind}: {message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Connection, message)
    }
}

/// Raw provider answer.
///
/// Some reasoning models leave `content` empty and put their answer in a
/// separate reasoning field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderResponse {
    pub content: Option<String>,
    pub reasoning_content: Option<String>,
}

impl ProviderResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            reasoning_content: None,
        }
    }

    /// Primary text, falling back to the reasoning text. `None` when both
    /// are empty or whitespace.
    pub fn effective_text(&self) -> Option<&str> {
        [self.content.as_deref(), self.reasoning_content.as_deref()]
            .into_iter()
            .flatten()
            .find(|t| !t.trim().is_empty())
    }
}

/// Client for a remote text-completion model
///
/// Implementations (adapters) live in the infrastructure layer. The timeout
/// is enforced by the implementation and reported as
/// [`ProviderErrorKind::Timeout`].
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn create(
        &self,
        conversation: &[ChatMessage],
        model: &str,
        timeout: Duration,
    ) -> Result<ProviderResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_text_prefers_content() {
        let r = ProviderResponse {
            content: Some("answer".into()),
            reasoning_content: Some("thinking".into()),
        };
        assert_eq!(r.effective_text(), Some("answer"));
    }

    #[test]
    fn test_effective_text_falls_back_to_reasoning() {
        let r = ProviderResponse {
            content: Some("   ".into()),
            reasoning_content: Some("<tool_call>fetch</tool_call>".into()),
        };
        assert_eq!(r.effective_text(), Some("<tool_call>fetch</tool_call>"));
        assert_eq!(ProviderResponse::default().effective_text(), None);
    }

    #[test]
    fn test_only_timeout_is_final() {
        assert!(!ProviderErrorKind::Timeout.is_retryable());
        assert!(ProviderErrorKind::RateLimited.is_retryable());
        assert!(ProviderErrorKind::Connection.is_retryable());
        assert_eq!(
            ProviderError::rate_limited("slow down").to_string(),
            "rate_limited: slow down"
        );
    }
}
