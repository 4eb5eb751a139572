//! Provider call layer
//!
//! Turns one conversation into one response text, or a terminal
//! [`ProviderCallError`]. Each attempt passes the shared rate gate first.
//!
//! | Failure          | Handling                                              |
//! |------------------|-------------------------------------------------------|
//! | Timeout          | abort immediately                                     |
//! | RateLimited      | switch deployment (free retry), else backoff          |
//! | other            | backoff, up to `max_attempts`                         |
//! | empty response   | fall back to reasoning text, else abort               |

use crate::config::RetryPolicy;
use crate::ports::deployment::{DeploymentManager, SingleDeployment};
use crate::ports::provider_client::{ProviderClient, ProviderErrorKind};
use crate::ports::rate_gate::{NoRateGate, RateGate};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tooltrial_domain::{ApiIssue, ApiIssueKind, ChatMessage, ErrorKind};
use tracing::{debug, warn};

/// Terminal outcome of a provider call
#[derive(Error, Debug, Clone)]
pub enum ProviderCallError {
    #[error("Provider request timed out: {0}")]
    Timeout(String),

    #[error("Provider retries exhausted after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },

    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl ProviderCallError {
    /// Error kind recorded on the episode result.
    pub fn error_kind(&self) -> ErrorKind {
        match self {
            ProviderCallError::Timeout(_) => ErrorKind::Timeout,
            ProviderCallError::Exhausted { .. } => ErrorKind::ApiExhausted,
            ProviderCallError::EmptyResponse => ErrorKind::EmptyResponse,
        }
    }
}

/// Result of one provider call, with every issue met along the way.
#[derive(Debug)]
pub struct ProviderCall {
    pub outcome: Result<String, ProviderCallError>,
    pub issues: Vec<ApiIssue>,
    /// Requests sent, failovers included
    pub requests: u32,
}

/// Calls a provider with retry, backoff, failover and rate gating
pub struct ProviderCaller<P: ProviderClient + 'static> {
    client: Arc<P>,
    rate_gate: Arc<dyn RateGate>,
    deployments: Arc<dyn DeploymentManager>,
    policy: RetryPolicy,
    timeout: Duration,
}

impl<P: ProviderClient + 'static> Clone for ProviderCaller<P> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            rate_gate: self.rate_gate.clone(),
            deployments: self.deployments.clone(),
            policy: self.policy.clone(),
            timeout: self.timeout,
        }
    }
}

impl<P: ProviderClient + 'static> ProviderCaller<P> {
    pub fn new(client: Arc<P>) -> Self {
        Self {
            client,
            rate_gate: Arc::new(NoRateGate),
            deployments: Arc::new(SingleDeployment),
            policy: RetryPolicy::default(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_rate_gate(mut self, gate: Arc<dyn RateGate>) -> Self {
        self.rate_gate = gate;
        self
    }

    pub fn with_deployments(mut self, deployments: Arc<dyn DeploymentManager>) -> Self {
        self.deployments = deployments;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send `conversation` to `model` on behalf of turn `turn`.
    pub async fn call(&self, conversation: &[ChatMessage], model: &str, turn: usize) -> ProviderCall {
        let mut issues = Vec::new();
        let mut requests = 0u32;
        let mut attempt = 0u32;
        let mut failovers = 0u32;
        let mut deployment = self.deployments.current(model);

        loop {
            self.rate_gate.acquire(model).await;
            requests += 1;
            debug!(model, deployment = %deployment, attempt, "Sending provider request");

            let error = match self.client.create(conversation, &deployment, self.timeout).await {
                Ok(response) => {
                    let outcome = match response.effective_text() {
                        Some(text) => Ok(text.to_string()),
                        None => {
                            warn!(model, turn, "Provider returned neither content nor reasoning");
                            issues.push(ApiIssue::new(
                                ApiIssueKind::EmptyResponse,
                                turn,
                                "empty content and reasoning",
                            ));
                            Err(ProviderCallError::EmptyResponse)
                        }
                    };
                    return ProviderCall {
                        outcome,
                        issues,
                        requests,
                    };
                }
                Err(error) => error,
            };

            issues.push(ApiIssue::new(error.kind.issue_kind(), turn, error.message.clone()));

            if !error.kind.is_retryable() {
                warn!(model, turn, error = %error, "Provider call aborted");
                return ProviderCall {
                    outcome: Err(ProviderCallError::Timeout(error.message)),
                    issues,
                    requests,
                };
            }

            if error.kind == ProviderErrorKind::RateLimited
                && failovers < self.policy.max_failovers
                && let Some(next) = self.deployments.switch(model, &deployment)
            {
                failovers += 1;
                warn!(model, from = %deployment, to = %next, "Rate limited, switching deployment");
                issues.push(ApiIssue::new(
                    ApiIssueKind::DeploymentSwitched,
                    turn,
                    format!("{} -> {}", deployment, next),
                ));
                deployment = next;
                continue;
            }

            if attempt + 1 >= self.policy.max_attempts {
                let attempts = attempt + 1;
                warn!(model, turn, attempts, error = %error, "Provider retries exhausted");
                issues.push(ApiIssue::new(
                    ApiIssueKind::RetriesExhausted,
                    turn,
                    format!("{} attempts", attempts),
                ));
                return ProviderCall {
                    outcome: Err(ProviderCallError::Exhausted {
                        attempts,
                        last_error: error.to_string(),
                    }),
                    issues,
                    requests,
                };
            }

            let jitter = self.policy.sample_jitter(&mut rand::thread_rng());
            let delay = self.policy.backoff_delay(attempt, jitter);
            warn!(
                model,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Provider call failed, backing off"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
