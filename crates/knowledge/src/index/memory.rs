//! In-memory vector index.
//!
//! Brute-force cosine similarity over an in-process store. Used by tests
//! and local development; the production backend is the remote index.

use crate::index::{ScopeFilter, VectorIndex};
use crate::types::ScoredDocument;
use draftsmith_core::AppResult;
use tokio::sync::RwLock;

struct Entry {
    id: String,
    vector: Vec<f32>,
    metadata: serde_json::Value,
}

/// In-process vector index with cosine ranking.
#[derive(Default)]
pub struct MemoryIndex {
    entries: RwLock<Vec<Entry>>,
}

impl MemoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored vectors.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the index holds no vectors.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

fn matches_filter(metadata: &serde_json::Value, filter: Option<&ScopeFilter>) -> bool {
    match filter {
        None => true,
        Some(filter) => metadata
            .get("workspace_id")
            .and_then(|v| v.as_str())
            .map(|ws| ws == filter.workspace_id)
            .unwrap_or(false),
    }
}

#[async_trait::async_trait]
impl VectorIndex for MemoryIndex {
    async fn upsert(
        &self,
        id: &str,
        vector: &[f32],
        metadata: serde_json::Value,
    ) -> AppResult<()> {
        let mut entries = self.entries.write().await;

        if let Some(existing) = entries.iter_mut().find(|e| e.id == id) {
            existing.vector = vector.to_vec();
            existing.metadata = metadata;
        } else {
            entries.push(Entry {
                id: id.to_string(),
                vector: vector.to_vec(),
                metadata,
            });
        }

        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&ScopeFilter>,
    ) -> AppResult<Vec<ScoredDocument>> {
        let entries = self.entries.read().await;

        let mut scored: Vec<ScoredDocument> = entries
            .iter()
            .filter(|e| matches_filter(&e.metadata, filter))
            .map(|e| ScoredDocument {
                id: e.id.clone(),
                text: e
                    .metadata
                    .get("text")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                score: cosine_similarity(vector, &e.vector),
                metadata: e.metadata.clone(),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);

        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_upsert_and_query() {
        let index = MemoryIndex::new();
        index
            .upsert("a", &[1.0, 0.0], json!({"text": "doc a"}))
            .await
            .unwrap();
        index
            .upsert("b", &[0.0, 1.0], json!({"text": "doc b"}))
            .await
            .unwrap();

        let results = index.query(&[1.0, 0.1], 2, None).await.unwrap();
        assert_eq!(results.len(), 2);
        // Closest vector first
        assert_eq!(results[0].id, "a");
        assert!(results[0].score > results[1].score);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing() {
        let index = MemoryIndex::new();
        index
            .upsert("a", &[1.0, 0.0], json!({"text": "old"}))
            .await
            .unwrap();
        index
            .upsert("a", &[0.0, 1.0], json!({"text": "new"}))
            .await
            .unwrap();

        assert_eq!(index.len().await, 1);
        let results = index.query(&[0.0, 1.0], 1, None).await.unwrap();
        assert_eq!(results[0].text, "new");
    }

    #[tokio::test]
    async fn test_scope_filter() {
        let index = MemoryIndex::new();
        index
            .upsert(
                "a",
                &[1.0, 0.0],
                json!({"text": "ws1 doc", "workspace_id": "ws-1"}),
            )
            .await
            .unwrap();
        index
            .upsert(
                "b",
                &[1.0, 0.0],
                json!({"text": "ws2 doc", "workspace_id": "ws-2"}),
            )
            .await
            .unwrap();

        let filter = ScopeFilter::workspace("ws-1");
        let results = index.query(&[1.0, 0.0], 5, Some(&filter)).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "a");
    }

    #[tokio::test]
    async fn test_filter_excludes_unscoped_documents() {
        let index = MemoryIndex::new();
        index
            .upsert("a", &[1.0, 0.0], json!({"text": "no scope"}))
            .await
            .unwrap();

        let filter = ScopeFilter::workspace("ws-1");
        let results = index.query(&[1.0, 0.0], 5, Some(&filter)).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_top_k_truncation() {
        let index = MemoryIndex::new();
        for i in 0..10 {
            index
                .upsert(
                    &format!("doc-{}", i),
                    &[1.0, i as f32 * 0.1],
                    json!({"text": "doc"}),
                )
                .await
                .unwrap();
        }

        let results = index.query(&[1.0, 0.0], 3, None).await.unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_cosine_similarity_edge_cases() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
    }
}
