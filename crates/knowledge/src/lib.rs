//! Knowledge retrieval crate for the Draftsmith pipeline.
//!
//! Grounds content generation in workspace-scoped documents:
//! - Embedding providers (`EmbeddingProvider` trait, OpenAI + mock)
//! - Vector index backends (`VectorIndex` trait, remote + in-memory)
//! - The `KnowledgeRetriever`, which ties the two together and degrades
//!   gracefully when no index is configured

pub mod embeddings;
pub mod index;
pub mod retriever;
pub mod types;

pub use embeddings::{create_provider, EmbeddingProvider};
pub use index::{MemoryIndex, RemoteIndex, ScopeFilter, VectorIndex};
pub use retriever::{KnowledgeRetriever, DEFAULT_TOP_K};
pub use types::ScoredDocument;
