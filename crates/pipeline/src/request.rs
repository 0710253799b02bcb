//! Generation request and validation.

use crate::brand::BrandProfile;
use draftsmith_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Parameters for one content generation run.
///
/// Topic, content type, tone, and target audience are required; missing
/// any of them is a validation failure, never a silent default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Content topic
    pub topic: String,

    /// Type of content (blog, social_post, ...)
    pub content_type: String,

    /// Desired tone
    pub tone: String,

    /// Target audience
    pub target_audience: String,

    /// Optional key points to include
    #[serde(default)]
    pub key_points: Option<String>,

    /// Optional brand guidelines
    #[serde(default)]
    pub brand_profile: Option<BrandProfile>,

    /// Optional workspace scope for knowledge retrieval
    #[serde(default)]
    pub workspace_id: Option<String>,
}

impl GenerationRequest {
    /// Create a request with the four required fields.
    pub fn new(
        topic: impl Into<String>,
        content_type: impl Into<String>,
        tone: impl Into<String>,
        target_audience: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            content_type: content_type.into(),
            tone: tone.into(),
            target_audience: target_audience.into(),
            key_points: None,
            brand_profile: None,
            workspace_id: None,
        }
    }

    /// Attach key points.
    pub fn with_key_points(mut self, key_points: impl Into<String>) -> Self {
        self.key_points = Some(key_points.into());
        self
    }

    /// Attach a brand profile.
    pub fn with_brand_profile(mut self, profile: BrandProfile) -> Self {
        self.brand_profile = Some(profile);
        self
    }

    /// Attach a workspace scope.
    pub fn with_workspace_id(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    /// Validate the required fields, naming every missing one.
    ///
    /// Runs before any external call is made.
    pub fn validate(&self) -> AppResult<()> {
        let mut missing = Vec::new();

        if self.topic.trim().is_empty() {
            missing.push("topic");
        }
        if self.content_type.trim().is_empty() {
            missing.push("content_type");
        }
        if self.tone.trim().is_empty() {
            missing.push("tone");
        }
        if self.target_audience.trim().is_empty() {
            missing.push("target_audience");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Missing required parameters: {}",
                missing.join(", ")
            )))
        }
    }
}
