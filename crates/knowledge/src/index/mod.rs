//! Vector index abstraction.
//!
//! Defines a trait for provider-agnostic vector storage and retrieval.
//! The production backend is a remote managed index; tests and local dev
//! use the in-memory implementation.

pub mod memory;
pub mod remote;

pub use memory::MemoryIndex;
pub use remote::RemoteIndex;

use crate::types::ScoredDocument;
use draftsmith_core::AppResult;
use serde::{Deserialize, Serialize};

/// Metadata filter restricting a query to one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFilter {
    /// Workspace identity to match on document metadata
    pub workspace_id: String,
}

impl ScopeFilter {
    /// Create a filter for the given workspace.
    pub fn workspace(workspace_id: impl Into<String>) -> Self {
        Self {
            workspace_id: workspace_id.into(),
        }
    }
}

/// Trait for vector index backends.
///
/// Implementations must support:
/// - Upserting vectors with metadata
/// - Querying for the top-k most similar vectors, optionally scoped
///
/// Matches are returned ordered by descending similarity.
#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or update a vector with its metadata.
    async fn upsert(
        &self,
        id: &str,
        vector: &[f32],
        metadata: serde_json::Value,
    ) -> AppResult<()>;

    /// Query for the top-k most similar documents.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&ScopeFilter>,
    ) -> AppResult<Vec<ScoredDocument>>;
}
