//! Generate command handler.
//!
//! Runs the four-stage content pipeline from CLI parameters and prints
//! the result to stdout.

use clap::Args;
use draftsmith_core::{config::AppConfig, AppError, AppResult};
use draftsmith_llm::create_client;
use draftsmith_pipeline::{BrandProfile, ContentPipeline, GenerationRequest};
use std::path::PathBuf;

/// Generate content through the four-stage pipeline
#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Content topic
    #[arg(long)]
    pub topic: String,

    /// Type of content (blog, social_post, newsletter, ...)
    #[arg(long)]
    pub content_type: String,

    /// Desired tone
    #[arg(long)]
    pub tone: String,

    /// Target audience
    #[arg(long)]
    pub audience: String,

    /// Key points to include, comma-separated
    #[arg(long)]
    pub key_points: Option<String>,

    /// JSON file with a brand profile (name, voice, guidelines)
    #[arg(long)]
    pub brand_file: Option<PathBuf>,

    /// Workspace scope for knowledge retrieval
    #[arg(long)]
    pub workspace_id: Option<String>,

    /// Print the full outcome as JSON instead of just the content
    #[arg(long)]
    pub json: bool,
}

impl GenerateCommand {
    /// Execute the generate command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing generate command");

        let mut request = GenerationRequest::new(
            &self.topic,
            &self.content_type,
            &self.tone,
            &self.audience,
        );

        if let Some(key_points) = &self.key_points {
            request = request.with_key_points(key_points.clone());
        }

        if let Some(brand_file) = &self.brand_file {
            request = request.with_brand_profile(load_brand_profile(brand_file)?);
        }

        if let Some(workspace_id) = &self.workspace_id {
            request = request.with_workspace_id(workspace_id.clone());
        }

        let api_key = config.resolve_api_key();
        let llm = create_client(
            &config.provider,
            config.endpoint.as_deref(),
            api_key.as_deref(),
            config.max_retries,
            std::time::Duration::from_secs(config.timeout_secs),
        )?;

        let retriever = super::build_retriever(config)?;

        let pipeline = ContentPipeline::new(llm, retriever)
            .with_model(&config.model)
            .with_temperature(config.temperature);

        let outcome = pipeline.run(&request).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else if let Some(content) = &outcome.content {
            println!("{}", content);
        }

        if !outcome.success {
            let error = outcome
                .error
                .unwrap_or_else(|| "Pipeline failed".to_string());
            return Err(AppError::Other(error));
        }

        Ok(())
    }
}

/// Load and decode a brand profile from a JSON file.
fn load_brand_profile(path: &PathBuf) -> AppResult<BrandProfile> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Config(format!("Failed to read brand file {:?}: {}", path, e))
    })?;

    let value: serde_json::Value = serde_json::from_str(&contents).map_err(|e| {
        AppError::Config(format!("Failed to parse brand file {:?}: {}", path, e))
    })?;

    BrandProfile::from_json(&value)
}
