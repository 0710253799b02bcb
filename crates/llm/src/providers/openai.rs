//! OpenAI completion provider implementation.
//!
//! Talks to the OpenAI chat completions API. API reference:
//! https://platform.openai.com/docs/api-reference/chat
//!
//! Provider failures are never thrown past the client boundary: every call
//! returns `AppResult`, and transient failures (transport errors, 429, 5xx)
//! are retried with exponential backoff up to a configurable attempt count.

use crate::client::{ChatMessage, ChatRequest, ChatResponse, LlmClient, LlmUsage};
use draftsmith_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default OpenAI API base URL.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts for retryable failures.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Initial backoff duration in milliseconds.
const INITIAL_BACKOFF_MS: u64 = 100;

/// OpenAI chat completions request payload.
#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// OpenAI chat completions response payload.
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    model: String,
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Error body returned by the OpenAI API.
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// OpenAI completion client.
pub struct OpenAiClient {
    /// Base URL for the API
    base_url: String,

    /// Bearer token
    api_key: String,

    /// HTTP client with request timeout applied
    client: reqwest::Client,

    /// Number of attempts for retryable failures
    max_retries: u32,
}

impl OpenAiClient {
    /// Create a new OpenAI client with default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a new OpenAI client with a custom base URL.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set the number of attempts for retryable failures.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        self
    }

    /// Send the request once, classifying the failure as retryable or not.
    async fn complete_once(&self, request: &ChatRequest) -> Result<ChatResponse, CallError> {
        let url = format!("{}/chat/completions", self.base_url);

        let payload = OpenAiRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CallError::Retryable(format!("Transport error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let message = serde_json::from_str::<OpenAiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            let description = format!("OpenAI API error ({}): {}", status, message);

            // Rate limits and server errors are worth retrying; other
            // client errors are not.
            return if status.as_u16() == 429 || status.is_server_error() {
                Err(CallError::Retryable(description))
            } else {
                Err(CallError::Fatal(description))
            };
        }

        let body: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| CallError::Fatal(format!("Failed to parse OpenAI response: {}", e)))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CallError::Fatal("OpenAI response contained no choices".to_string()))?;

        let usage = body
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        Ok(ChatResponse {
            content: choice.message.content,
            model: body.model,
            usage,
        })
    }
}

/// Internal failure classification for the retry loop.
enum CallError {
    Retryable(String),
    Fatal(String),
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        debug!(model = %request.model, messages = request.messages.len(), "Sending completion request to OpenAI");

        let mut attempt = 0;
        let mut last_error = String::new();

        while attempt < self.max_retries {
            match self.complete_once(request).await {
                Ok(response) => {
                    debug!(model = %response.model, "Received completion from OpenAI");
                    return Ok(response);
                }
                Err(CallError::Fatal(description)) => {
                    return Err(AppError::Llm(description));
                }
                Err(CallError::Retryable(description)) => {
                    attempt += 1;
                    last_error = description;

                    if attempt < self.max_retries {
                        let backoff_ms = INITIAL_BACKOFF_MS * 2_u64.pow(attempt);
                        warn!(
                            "Completion failed (attempt {}/{}), retrying in {}ms: {}",
                            attempt, self.max_retries, backoff_ms, last_error
                        );
                        tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    }
                }
            }
        }

        Err(AppError::Llm(last_error))
    }
}
