//! Embedding provider trait and factory.

use draftsmith_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "openai", "mock")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Knowledge("No embedding returned".to_string()))
    }
}

/// Create an embedding provider based on provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai", "mock")
/// * `model` - Embedding model identifier
/// * `dimensions` - Expected embedding dimensionality
/// * `api_key` - API key for providers that require one
/// * `max_retries` - Number of attempts for retryable provider failures
/// * `timeout` - Per-request deadline
pub fn create_provider(
    provider: &str,
    model: &str,
    dimensions: usize,
    api_key: Option<&str>,
    max_retries: u32,
    timeout: Duration,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match provider {
        "mock" => {
            let provider = super::providers::mock::MockProvider::new(dimensions);
            Ok(Arc::new(provider))
        }

        "openai" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("OpenAI embedding provider requires an API key".to_string())
            })?;
            let provider =
                super::providers::openai::OpenAiEmbeddings::new(api_key, model, dimensions)
                    .with_max_retries(max_retries)
                    .with_timeout(timeout);
            Ok(Arc::new(provider))
        }

        _ => Err(AppError::Knowledge(format!(
            "Unknown embedding provider: '{}'. Supported providers: openai, mock",
            provider
        ))),
    }
}
