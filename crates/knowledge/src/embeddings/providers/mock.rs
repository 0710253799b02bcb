//! Mock embedding provider using hashed character trigrams.

use crate::embeddings::provider::EmbeddingProvider;
use draftsmith_core::AppResult;

/// Mock provider for testing and offline development.
///
/// Generates deterministic unit vectors from character trigrams and word
/// hashes. Not semantically meaningful, but content-dependent and stable,
/// which is all the retrieval tests need.
#[derive(Debug)]
pub struct MockProvider {
    dimensions: usize,
}

impl MockProvider {
    /// Create a new mock provider with the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn hash_into(&self, embedding: &mut [f32], bytes: &[u8], seed: u64, weight: f32) {
        let hash = bytes
            .iter()
            .fold(seed, |acc, b| acc.wrapping_mul(37).wrapping_add(*b as u64));
        embedding[(hash as usize) % self.dimensions] += weight;
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0; self.dimensions];

        let lower = text.to_lowercase();
        for word in lower.split_whitespace().filter(|w| w.len() > 2) {
            let chars: Vec<char> = word.chars().collect();

            // Character trigrams spread each word across several dimensions
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                self.hash_into(&mut embedding, trigram.as_bytes(), 17, 1.0);
            }

            // Whole-word hash keeps distinct words distinguishable even when
            // they share trigrams
            self.hash_into(&mut embedding, word.as_bytes(), 31, 1.5);
        }

        // Normalize to unit vector so dot products are cosine similarities
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.generate(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dimensions_and_names() {
        let provider = MockProvider::new(384);
        assert_eq!(provider.dimensions(), 384);
        assert_eq!(provider.provider_name(), "mock");
        assert_eq!(provider.model_name(), "trigram-v1");
    }

    #[tokio::test]
    async fn test_embed_is_unit_vector() {
        let provider = MockProvider::new(384);
        let embedding = provider.embed("hello world").await.unwrap();

        assert_eq!(embedding.len(), 384);
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_embed_deterministic() {
        let provider = MockProvider::new(384);
        let first = provider.embed("deterministic test").await.unwrap();
        let second = provider.embed("deterministic test").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_different_texts_differ() {
        let provider = MockProvider::new(384);
        let a = provider.embed("remote work productivity").await.unwrap();
        let b = provider.embed("quarterly revenue forecast").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let provider = MockProvider::new(384);
        let embedding = provider.embed("").await.unwrap();
        assert!(embedding.iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn test_utf8_safety() {
        let provider = MockProvider::new(384);
        let embedding = provider
            .embed("conteúdo de marketing 🎯 em português")
            .await
            .unwrap();
        assert_eq!(embedding.len(), 384);
    }

    #[tokio::test]
    async fn test_similar_texts_are_closer() {
        let provider = MockProvider::new(384);
        let base = provider.embed("remote work productivity tips").await.unwrap();
        let near = provider.embed("productivity tips for remote work").await.unwrap();
        let far = provider.embed("gardening tomatoes in spring").await.unwrap();

        let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };
        assert!(dot(&base, &near) > dot(&base, &far));
    }
}
