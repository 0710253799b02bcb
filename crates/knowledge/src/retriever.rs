//! Workspace-scoped knowledge retrieval.
//!
//! Ties the embedding provider and vector index together. Retrieval is a
//! grounding aid, not a hard dependency: a missing index or a blank query
//! degrades to empty results instead of failing the pipeline.

use crate::embeddings::EmbeddingProvider;
use crate::index::{ScopeFilter, VectorIndex};
use crate::types::{text_preview, ScoredDocument};
use draftsmith_core::{AppError, AppResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default number of matches to retrieve.
pub const DEFAULT_TOP_K: usize = 3;

/// Retrieves topic-relevant snippets from the vector index.
#[derive(Clone)]
pub struct KnowledgeRetriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Option<Arc<dyn VectorIndex>>,
}

impl KnowledgeRetriever {
    /// Create a retriever backed by the given index.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            embedder,
            index: Some(index),
        }
    }

    /// Create a retriever with no index; every retrieval returns empty.
    pub fn without_index(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            index: None,
        }
    }

    /// Whether an index is configured.
    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    /// Retrieve the top-k documents most similar to the query.
    ///
    /// Blank queries return empty without touching the embedding provider
    /// or the index. An unconfigured index is a degraded-mode condition,
    /// not an error. Results keep the index's own relevance ordering.
    pub async fn retrieve(
        &self,
        query: &str,
        workspace_id: Option<&str>,
        top_k: usize,
    ) -> AppResult<Vec<ScoredDocument>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let Some(index) = &self.index else {
            warn!("No vector index configured; retrieval degraded to empty results");
            return Ok(Vec::new());
        };

        let embedding = self.embedder.embed(query).await?;
        if embedding.is_empty() {
            return Ok(Vec::new());
        }

        let filter = workspace_id.map(ScopeFilter::workspace);
        let documents = index.query(&embedding, top_k, filter.as_ref()).await?;

        debug!(
            matches = documents.len(),
            top_k, "Knowledge retrieval complete"
        );

        Ok(documents)
    }

    /// Store a document in the index, embedding it first.
    ///
    /// Returns the generated document id. Blank text is skipped with an
    /// `Ok(None)`; storing without an index is an error, unlike retrieval,
    /// because the caller explicitly asked to persist something.
    pub async fn store(
        &self,
        text: &str,
        workspace_id: &str,
        extra_metadata: serde_json::Value,
    ) -> AppResult<Option<String>> {
        if text.trim().is_empty() {
            debug!("Skipping empty document");
            return Ok(None);
        }

        let index = self.index.as_ref().ok_or_else(|| {
            AppError::Knowledge("Cannot store document: no vector index configured".to_string())
        })?;

        let embedding = self.embedder.embed(text).await?;

        let id = uuid::Uuid::new_v4().to_string();

        let mut metadata = serde_json::json!({
            "workspace_id": workspace_id,
            "text": text_preview(text),
        });
        if let (Some(target), Some(extra)) = (metadata.as_object_mut(), extra_metadata.as_object())
        {
            for (key, value) in extra {
                target.entry(key.clone()).or_insert(value.clone());
            }
        }

        index.upsert(&id, &embedding, metadata).await?;

        debug!(%id, workspace_id, "Stored document in vector index");

        Ok(Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryIndex;
    use draftsmith_core::AppResult;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Embedding fake that counts calls, for asserting short-circuits.
    #[derive(Debug, Default)]
    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl EmbeddingProvider for CountingEmbedder {
        fn provider_name(&self) -> &str {
            "counting"
        }

        fn model_name(&self) -> &str {
            "counting-v1"
        }

        fn dimensions(&self) -> usize {
            2
        }

        async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    fn retriever_with_index() -> (Arc<CountingEmbedder>, Arc<MemoryIndex>, KnowledgeRetriever) {
        let embedder = Arc::new(CountingEmbedder::default());
        let index = Arc::new(MemoryIndex::new());
        let retriever = KnowledgeRetriever::new(embedder.clone(), index.clone());
        (embedder, index, retriever)
    }

    #[tokio::test]
    async fn test_blank_query_skips_providers() {
        let (embedder, _index, retriever) = retriever_with_index();

        let results = retriever.retrieve("   ", None, DEFAULT_TOP_K).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_index_degrades_to_empty() {
        let embedder = Arc::new(CountingEmbedder::default());
        let retriever = KnowledgeRetriever::without_index(embedder.clone());

        let results = retriever
            .retrieve("remote work", Some("ws-1"), DEFAULT_TOP_K)
            .await
            .unwrap();

        assert!(results.is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_retrieve_scoped() {
        let (_, index, retriever) = retriever_with_index();

        index
            .upsert(
                "a",
                &[1.0, 0.0],
                serde_json::json!({"text": "in scope", "workspace_id": "ws-1"}),
            )
            .await
            .unwrap();
        index
            .upsert(
                "b",
                &[1.0, 0.0],
                serde_json::json!({"text": "out of scope", "workspace_id": "ws-2"}),
            )
            .await
            .unwrap();

        let results = retriever
            .retrieve("anything", Some("ws-1"), DEFAULT_TOP_K)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "in scope");
    }

    #[tokio::test]
    async fn test_store_and_retrieve_round_trip() {
        let (_, _, retriever) = retriever_with_index();

        let id = retriever
            .store("async communication beats meetings", "ws-1", serde_json::json!({}))
            .await
            .unwrap();
        assert!(id.is_some());

        let results = retriever
            .retrieve("communication", Some("ws-1"), DEFAULT_TOP_K)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].workspace_id(), Some("ws-1"));
    }

    #[tokio::test]
    async fn test_store_blank_text_is_skipped() {
        let (_, index, retriever) = retriever_with_index();

        let id = retriever
            .store("  ", "ws-1", serde_json::json!({}))
            .await
            .unwrap();

        assert!(id.is_none());
        assert!(index.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_without_index_errors() {
        let embedder = Arc::new(CountingEmbedder::default());
        let retriever = KnowledgeRetriever::without_index(embedder);

        let result = retriever.store("text", "ws-1", serde_json::json!({})).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_store_preserves_extra_metadata() {
        let (_, index, retriever) = retriever_with_index();

        retriever
            .store(
                "doc body",
                "ws-1",
                serde_json::json!({"source": "handbook.md"}),
            )
            .await
            .unwrap();

        let results = index.query(&[1.0, 0.0], 1, None).await.unwrap();
        assert_eq!(results[0].metadata["source"], "handbook.md");
        assert_eq!(results[0].metadata["workspace_id"], "ws-1");
    }
}
