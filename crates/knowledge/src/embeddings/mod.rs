//! Embedding generation for knowledge retrieval.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
