//! Command handlers for the Draftsmith CLI.

pub mod generate;
pub mod knowledge;

pub use generate::GenerateCommand;
pub use knowledge::KnowledgeCommand;

use draftsmith_core::config::AppConfig;
use draftsmith_core::AppResult;
use draftsmith_knowledge::{embeddings, KnowledgeRetriever, RemoteIndex};
use std::sync::Arc;
use std::time::Duration;

/// Build the knowledge retriever from configuration.
///
/// Without an `index` section the retriever runs in degraded mode and
/// every retrieval yields empty results.
pub(crate) fn build_retriever(config: &AppConfig) -> AppResult<KnowledgeRetriever> {
    let api_key = config.resolve_api_key();
    let timeout = Duration::from_secs(config.timeout_secs);

    let embedder = embeddings::create_provider(
        &config.embedding.provider,
        &config.embedding.model,
        config.embedding.dimensions,
        api_key.as_deref(),
        config.max_retries,
        timeout,
    )?;

    match &config.index {
        Some(index_settings) => {
            let index_api_key = config.resolve_index_api_key()?.unwrap_or_default();
            let index = Arc::new(
                RemoteIndex::new(&index_settings.host, index_api_key).with_timeout(timeout),
            );
            Ok(KnowledgeRetriever::new(embedder, index))
        }
        None => {
            tracing::warn!("No vector index configured; knowledge retrieval disabled");
            Ok(KnowledgeRetriever::without_index(embedder))
        }
    }
}
