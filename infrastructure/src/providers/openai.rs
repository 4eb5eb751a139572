//! OpenAI-compatible chat completions client.
//!
//! Works against any endpoint exposing `POST {base_url}/chat/completions`
//! (OpenAI, Azure-style gateways, vLLM, llama.cpp servers). Failures are
//! classified for the provider call layer:
//!
//! | Failure | Kind |
//! |---|---|
//! | 429 | `RateLimited` |
//! | 408, 504, client-side timeout | `Timeout` |
//! | other 4xx | `InvalidRequest` |
//! | 5xx, connect errors | `Connection` |

use crate::config::FileProviderConfig;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tooltrial_application::{ProviderClient, ProviderError, ProviderErrorKind, ProviderResponse};
use tooltrial_domain::ChatMessage;
use tooltrial_domain::core::string::truncate;
use tracing::{debug, warn};

const MAX_ERROR_BODY: usize = 300;

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    reasoning_content: Option<String>,
}

/// Provider client for OpenAI-compatible endpoints
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    temperature: Option<f32>,
}

impl OpenAiCompatibleClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            temperature: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Build from the `[provider]` section, reading the key from the
    /// configured environment variable.
    ///
    /// A missing key is allowed: local servers usually need none.
    pub fn from_config(config: &FileProviderConfig) -> Self {
        let mut client = Self::new(&config.base_url);
        if let Some(temperature) = config.temperature {
            client = client.with_temperature(temperature);
        }
        match std::env::var(&config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => client.with_api_key(key),
            _ => {
                warn!(
                    "{} is not set; calling {} without an API key",
                    config.api_key_env, config.base_url
                );
                client
            }
        }
    }
}

#[async_trait]
impl ProviderClient for OpenAiCompatibleClient {
    async fn create(
        &self,
        conversation: &[ChatMessage],
        model: &str,
        timeout: Duration,
    ) -> Result<ProviderResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let payload = ChatCompletionRequest {
            model,
            messages: conversation,
            temperature: self.temperature,
        };

        let mut request = self.client.post(&url).timeout(timeout).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        debug!("POST {} ({} messages, model {})", url, conversation.len(), model);
        let response = request.send().await.map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(classify_transport)?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| ProviderResponse {
                content: choice.message.content,
                reasoning_content: choice.message.reasoning_content,
            })
            .unwrap_or_default())
    }
}

/// Classify a non-success HTTP status.
pub fn classify_status(status: StatusCode, body: &str) -> ProviderError {
    let kind = match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderErrorKind::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ProviderErrorKind::Timeout,
        s if s.is_server_error() => ProviderErrorKind::Connection,
        s if s.is_client_error() => ProviderErrorKind::InvalidRequest,
        _ => ProviderErrorKind::Other,
    };
    let body = body.trim();
    let message = if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, truncate(body, MAX_ERROR_BODY))
    };
    ProviderError::new(kind, message)
}

/// Classify a transport-level reqwest failure.
pub fn classify_transport(error: reqwest::Error) -> ProviderError {
    let kind = if error.is_timeout() {
        ProviderErrorKind::Timeout
    } else if error.is_connect() || error.is_request() {
        ProviderErrorKind::Connection
    } else {
        ProviderErrorKind::Other
    };
    ProviderError::new(kind, error.to_string())
}
