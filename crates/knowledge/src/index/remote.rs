//! Remote vector index backend.
//!
//! Talks to a managed vector index over HTTP (Pinecone-style data-plane
//! API): `POST /vectors/upsert` and `POST /query`. The index itself is
//! created and sized (1536 dimensions, cosine metric) out of band; this
//! client only reads and writes vectors.

use crate::index::{ScopeFilter, VectorIndex};
use crate::types::ScoredDocument;
use draftsmith_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<UpsertVector<'a>>,
}

#[derive(Debug, Serialize)]
struct UpsertVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    vector: &'a [f32],
    #[serde(rename = "topK")]
    top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<serde_json::Value>,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: serde_json::Value,
}

/// HTTP client for a managed vector index.
pub struct RemoteIndex {
    /// Index host base URL
    host: String,

    /// Index API key
    api_key: String,

    /// HTTP client with request timeout applied
    client: reqwest::Client,
}

impl RemoteIndex {
    /// Create a client for the given index host.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            host: host.into(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Set the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        self
    }

    fn scope_to_filter(filter: Option<&ScopeFilter>) -> Option<serde_json::Value> {
        filter.map(|f| {
            serde_json::json!({
                "workspace_id": { "$eq": f.workspace_id }
            })
        })
    }

    async fn check_status(response: reqwest::Response, action: &str) -> AppResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Knowledge(format!(
                "Vector index {} failed ({}): {}",
                action, status, body
            )));
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl VectorIndex for RemoteIndex {
    async fn upsert(
        &self,
        id: &str,
        vector: &[f32],
        metadata: serde_json::Value,
    ) -> AppResult<()> {
        let url = format!("{}/vectors/upsert", self.host);

        let request = UpsertRequest {
            vectors: vec![UpsertVector {
                id,
                values: vector,
                metadata,
            }],
        };

        debug!(id, "Upserting vector to remote index");

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Knowledge(format!("Failed to reach vector index: {}", e)))?;

        Self::check_status(response, "upsert").await?;
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&ScopeFilter>,
    ) -> AppResult<Vec<ScoredDocument>> {
        let url = format!("{}/query", self.host);

        let request = QueryRequest {
            vector,
            top_k,
            filter: Self::scope_to_filter(filter),
            include_metadata: true,
        };

        debug!(top_k, "Querying remote vector index");

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Knowledge(format!("Failed to reach vector index: {}", e)))?;

        let response = Self::check_status(response, "query").await?;

        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| AppError::Knowledge(format!("Failed to parse query response: {}", e)))?;

        // The index returns matches in its own relevance order; keep it.
        let documents = body
            .matches
            .into_iter()
            .map(|m| ScoredDocument {
                text: m
                    .metadata
                    .get("text")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                id: m.id,
                score: m.score,
                metadata: m.metadata,
            })
            .collect();

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_filter_shape() {
        let filter = ScopeFilter::workspace("ws-1");
        let json = RemoteIndex::scope_to_filter(Some(&filter)).unwrap();
        assert_eq!(json["workspace_id"]["$eq"], "ws-1");

        assert!(RemoteIndex::scope_to_filter(None).is_none());
    }

    #[test]
    fn test_query_request_serialization() {
        let vector = vec![0.1, 0.2];
        let request = QueryRequest {
            vector: &vector,
            top_k: 3,
            filter: None,
            include_metadata: true,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["topK"], 3);
        assert_eq!(json["includeMetadata"], true);
        assert!(json.get("filter").is_none());
    }

    #[test]
    fn test_query_response_deserialization() {
        let body = r#"{
            "matches": [
                {"id": "d1", "score": 0.92, "metadata": {"text": "snippet", "workspace_id": "ws-1"}}
            ]
        }"#;

        let parsed: QueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.matches.len(), 1);
        assert_eq!(parsed.matches[0].id, "d1");
        assert!((parsed.matches[0].score - 0.92).abs() < 1e-6);
    }

    #[test]
    fn test_query_response_without_matches() {
        let parsed: QueryResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.matches.is_empty());
    }
}
