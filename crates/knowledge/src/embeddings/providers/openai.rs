//! OpenAI embedding provider.
//!
//! Generates semantic embeddings via the OpenAI embeddings API
//! (text-embedding-3-small, 1536 dimensions in the default configuration).
//! Transient failures are retried with exponential backoff; blank input
//! short-circuits to an empty vector without a network call.

use crate::embeddings::provider::EmbeddingProvider;
use async_trait::async_trait;
use draftsmith_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default OpenAI API base URL.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default number of attempts for retryable failures.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Initial backoff duration in milliseconds.
const INITIAL_BACKOFF_MS: u64 = 100;

/// Default request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Request payload for the embeddings API.
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

/// Response from the embeddings API.
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

/// OpenAI embedding provider.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddings {
    /// HTTP client with request timeout applied
    client: reqwest::Client,

    /// API base URL
    base_url: String,

    /// Bearer token
    api_key: String,

    /// Model name (e.g., "text-embedding-3-small")
    model: String,

    /// Expected embedding dimensions
    dimensions: usize,

    /// Number of attempts for retryable failures
    max_retries: u32,
}

/// Internal failure classification for the retry loop.
enum CallError {
    Retryable(String),
    Fatal(String),
}

impl OpenAiEmbeddings {
    /// Create a new OpenAI embedding provider.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, dimensions: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            dimensions,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
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

    /// Embed a batch with retry logic.
    ///
    /// Transport errors, 429, and 5xx are retried with exponential
    /// backoff; other client errors fail immediately.
    async fn embed_with_retries(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let mut attempt = 0;
        let mut last_error = String::new();

        while attempt < self.max_retries {
            match self.embed_once(texts).await {
                Ok(embeddings) => return Ok(embeddings),
                Err(CallError::Fatal(description)) => {
                    return Err(AppError::Knowledge(description));
                }
                Err(CallError::Retryable(description)) => {
                    attempt += 1;
                    last_error = description;

                    if attempt < self.max_retries {
                        let backoff_ms = INITIAL_BACKOFF_MS * 2_u64.pow(attempt);
                        warn!(
                            "Embedding failed (attempt {}/{}), retrying in {}ms: {}",
                            attempt, self.max_retries, backoff_ms, last_error
                        );
                        tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    }
                }
            }
        }

        Err(AppError::Knowledge(last_error))
    }

    /// Send the request once, classifying the failure as retryable or not.
    async fn embed_once(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, CallError> {
        let url = format!("{}/embeddings", self.base_url);

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        debug!("Sending embedding request for {} texts", texts.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CallError::Retryable(format!("Transport error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let description = format!("Embedding API error ({}): {}", status, error_text);

            // Rate limits and server errors are worth retrying; other
            // client errors are not.
            return if status.as_u16() == 429 || status.is_server_error() {
                Err(CallError::Retryable(description))
            } else {
                Err(CallError::Fatal(description))
            };
        }

        let body: EmbeddingResponse = response.json().await.map_err(|e| {
            CallError::Fatal(format!("Failed to parse embedding response: {}", e))
        })?;

        // The API reports an index per item; honor it rather than assuming
        // response order.
        let mut embeddings = vec![Vec::new(); texts.len()];
        for item in body.data {
            if item.embedding.len() != self.dimensions {
                return Err(CallError::Fatal(format!(
                    "Unexpected embedding dimensions: got {}, expected {}",
                    item.embedding.len(),
                    self.dimensions
                )));
            }
            if item.index >= embeddings.len() {
                return Err(CallError::Fatal(format!(
                    "Embedding index {} out of range for batch of {}",
                    item.index,
                    texts.len()
                )));
            }
            embeddings[item.index] = item.embedding;
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        // Blank input never reaches the network
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut results = self.embed_with_retries(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Knowledge("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        // Blank entries get zero vectors instead of a provider error
        let non_blank: Vec<String> = texts
            .iter()
            .filter(|t| !t.trim().is_empty())
            .cloned()
            .collect();

        if non_blank.is_empty() {
            return Ok(texts.iter().map(|_| vec![0.0; self.dimensions]).collect());
        }

        let mut computed = self.embed_with_retries(&non_blank).await?.into_iter();

        let embeddings = texts
            .iter()
            .map(|t| {
                if t.trim().is_empty() {
                    vec![0.0; self.dimensions]
                } else {
                    computed.next().unwrap_or_else(|| vec![0.0; self.dimensions])
                }
            })
            .collect();

        Ok(embeddings)
    }
}
