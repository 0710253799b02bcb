//! Mock completion provider for tests and offline development.

use crate::client::{ChatRequest, ChatResponse, LlmClient, LlmUsage};
use draftsmith_core::AppResult;

/// Deterministic offline provider.
///
/// Produces a short digest of the last user message so outputs are
/// content-dependent and stable across runs. Not a language model; exists
/// so the pipeline can be exercised end-to-end without network access.
pub struct MockClient {
    /// Prefix attached to every completion, useful for telling stages apart
    prefix: String,
}

impl MockClient {
    /// Create a mock client with no output prefix.
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
        }
    }

    /// Create a mock client whose completions start with the given prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn digest(&self, text: &str) -> String {
        let head: String = text.split_whitespace().take(12).collect::<Vec<_>>().join(" ");
        let hash = text
            .bytes()
            .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));

        if self.prefix.is_empty() {
            format!("[{:08x}] {}", hash & 0xffff_ffff, head)
        } else {
            format!("{} [{:08x}] {}", self.prefix, hash & 0xffff_ffff, head)
        }
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LlmClient for MockClient {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let content = self.digest(request.last_user_content().unwrap_or_default());

        Ok(ChatResponse {
            content,
            model: request.model.clone(),
            usage: LlmUsage::default(),
        })
    }
}
