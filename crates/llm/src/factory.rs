//! Completion provider factory.
//!
//! This module creates LLM clients based on application configuration.
//! It handles provider resolution and secret injection; the resulting
//! handle is passed into the pipeline by the host rather than held in a
//! process-wide singleton.

use crate::client::LlmClient;
use crate::providers::{MockClient, OpenAiClient};
use draftsmith_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai", "mock")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (required for providers that need it)
/// * `max_retries` - Number of attempts for retryable provider failures
/// * `timeout` - Per-request deadline
///
/// # Errors
/// Returns an error if the provider is unknown or a required secret is
/// missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    max_retries: u32,
    timeout: Duration,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "openai" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("OpenAI provider requires an API key".to_string())
            })?;

            let client = match endpoint {
                Some(endpoint) => OpenAiClient::with_base_url(api_key, endpoint),
                None => OpenAiClient::new(api_key),
            };
            Ok(Arc::new(client.with_max_retries(max_retries).with_timeout(timeout)))
        }
        "mock" => Ok(Arc::new(MockClient::new())),
        _ => Err(AppError::Config(format!("Unknown provider: {}", provider))),
    }
}
