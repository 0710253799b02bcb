//! Shared types for knowledge retrieval.

use serde::{Deserialize, Serialize};

/// Maximum length of the text preview stored in index metadata.
pub const TEXT_PREVIEW_CHARS: usize = 1000;

/// A document returned from a vector similarity search.
///
/// Read-only from the pipeline's perspective; ordering follows the index's
/// own relevance ranking (cosine similarity, descending).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredDocument {
    /// Stable document identifier
    pub id: String,

    /// Text snippet carried in the index metadata
    pub text: String,

    /// Similarity score reported by the index
    pub score: f32,

    /// Raw metadata (workspace scope, source attributes)
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl ScoredDocument {
    /// Workspace scope recorded in the metadata, if any.
    pub fn workspace_id(&self) -> Option<&str> {
        self.metadata.get("workspace_id").and_then(|v| v.as_str())
    }
}

/// Truncate text to the preview length on a char boundary.
pub fn text_preview(text: &str) -> &str {
    match text.char_indices().nth(TEXT_PREVIEW_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
