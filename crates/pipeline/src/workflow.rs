//! Pipeline orchestration.
//!
//! Sequences the four agents (ideation, research, drafting, editing),
//! threading each stage's output into the next stage's prompt. Stages run
//! strictly sequentially; there is no branching and no loop-back. Any
//! error inside the chain short-circuits the rest and surfaces as a failed
//! outcome with partial stage outputs discarded.

use crate::brand::brand_context;
use crate::context::{combine_context, knowledge_context};
use crate::prompts;
use crate::request::GenerationRequest;
use crate::roles::{self, RoleOverrides};
use draftsmith_core::AppResult;
use draftsmith_knowledge::{KnowledgeRetriever, DEFAULT_TOP_K};
use draftsmith_llm::LlmClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Stage names, in execution order.
pub const WORKFLOW_STEPS: [&str; 4] = ["ideation", "research", "content_creation", "editing"];

/// Terminal result of one pipeline run.
///
/// Constructed once at the pipeline boundary and not mutated afterwards.
/// On failure only the error is carried; intermediate stage outputs
/// computed before the failure are discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    /// Whether all four stages completed
    pub success: bool,

    /// Final edited content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Intermediate ideation output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ideas: Option<String>,

    /// Intermediate research output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research: Option<String>,

    /// Stage names executed, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub workflow_steps: Vec<String>,

    /// Human-readable failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineOutcome {
    fn completed(content: String, ideas: String, research: String) -> Self {
        Self {
            success: true,
            content: Some(content),
            ideas: Some(ideas),
            research: Some(research),
            workflow_steps: WORKFLOW_STEPS.iter().map(|s| s.to_string()).collect(),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: None,
            ideas: None,
            research: None,
            workflow_steps: Vec::new(),
            error: Some(error.into()),
        }
    }
}

struct StageOutputs {
    content: String,
    ideas: String,
    research: String,
}

/// The four-stage content generation pipeline.
///
/// Holds only injected client handles; each run constructs its own agent
/// instances, so one pipeline value can serve many concurrent requests.
pub struct ContentPipeline {
    llm: Arc<dyn LlmClient>,
    retriever: KnowledgeRetriever,
    model: String,
    temperature: f32,
    overrides: RoleOverrides,
}

impl ContentPipeline {
    /// Create a pipeline with default model settings.
    pub fn new(llm: Arc<dyn LlmClient>, retriever: KnowledgeRetriever) -> Self {
        Self {
            llm,
            retriever,
            model: "gpt-4o".to_string(),
            temperature: 0.7,
            overrides: RoleOverrides::default(),
        }
    }

    /// Set the default completion model for all roles.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the default sampling temperature for all roles.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Apply per-role overrides.
    pub fn with_overrides(mut self, overrides: RoleOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Run the full pipeline for one request.
    ///
    /// Validation failures and stage errors are both converted into a
    /// failed outcome here; internals use `AppResult` and `?` throughout.
    pub async fn run(&self, request: &GenerationRequest) -> PipelineOutcome {
        if let Err(e) = request.validate() {
            warn!("Rejected generation request: {}", e);
            return PipelineOutcome::failed(e.to_string());
        }

        match self.generate(request).await {
            Ok(outputs) => {
                PipelineOutcome::completed(outputs.content, outputs.ideas, outputs.research)
            }
            Err(e) => {
                warn!("Pipeline run failed: {}", e);
                PipelineOutcome::failed(e.to_string())
            }
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> AppResult<StageOutputs> {
        // Assemble the combined context once; every stage receives the
        // same block rather than re-deriving it.
        let documents = match &request.workspace_id {
            Some(workspace_id) => {
                self.retriever
                    .retrieve(&request.topic, Some(workspace_id), DEFAULT_TOP_K)
                    .await?
            }
            None => Vec::new(),
        };

        let knowledge = knowledge_context(&documents);
        let brand = brand_context(request.brand_profile.as_ref());
        let context = combine_context(&knowledge, &brand);

        info!(
            topic = %request.topic,
            content_type = %request.content_type,
            retrieved = documents.len(),
            has_brand = request.brand_profile.is_some(),
            "Starting content pipeline"
        );

        let attach = |agent: crate::agent::AgentConfig| {
            if context.is_empty() {
                agent
            } else {
                agent.with_knowledge_context(context.clone())
            }
        };

        info!("Stage 1/4: ideation");
        let ideation =
            attach(roles::ideation_agent(&self.model, self.temperature, self.overrides.ideation.as_ref()));
        let ideas = ideation
            .execute(self.llm.as_ref(), &prompts::ideation_prompt(request)?, &[])
            .await?;

        info!("Stage 2/4: research");
        let research_agent =
            attach(roles::research_agent(&self.model, self.temperature, self.overrides.research.as_ref()));
        let research = research_agent
            .execute(
                self.llm.as_ref(),
                &prompts::research_prompt(request, &ideas)?,
                &[],
            )
            .await?;

        info!("Stage 3/4: content creation");
        let writer =
            attach(roles::writer_agent(&self.model, self.temperature, self.overrides.writer.as_ref()));
        let draft = writer
            .execute(
                self.llm.as_ref(),
                &prompts::draft_prompt(request, &ideas, &research)?,
                &[],
            )
            .await?;

        info!("Stage 4/4: editing");
        let editor =
            attach(roles::editor_agent(&self.model, self.temperature, self.overrides.editor.as_ref()));
        let content = editor
            .execute(self.llm.as_ref(), &prompts::edit_prompt(request, &draft)?, &[])
            .await?;

        info!("Pipeline complete");

        Ok(StageOutputs {
            content,
            ideas,
            research,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::{BrandGuidelines, BrandProfile};
    use draftsmith_core::{AppError, AppResult};
    use draftsmith_knowledge::embeddings::EmbeddingProvider;
    use draftsmith_knowledge::{MemoryIndex, VectorIndex};
    use draftsmith_llm::{ChatRequest, ChatResponse, LlmUsage, Role};
    use std::sync::Mutex;

    /// Completion fake that records every request and replays a script.
    struct RecordingClient {
        requests: Mutex<Vec<ChatRequest>>,
        script: Vec<AppResult<String>>,
    }

    impl RecordingClient {
        fn scripted(outputs: Vec<AppResult<String>>) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                script: outputs,
            }
        }

        fn four_stages() -> Self {
            Self::scripted(vec![
                Ok("IDEAS-OUTPUT".to_string()),
                Ok("RESEARCH-OUTPUT".to_string()),
                Ok("DRAFT-OUTPUT".to_string()),
                Ok("FINAL-OUTPUT".to_string()),
            ])
        }

        fn recorded(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for RecordingClient {
        fn provider_name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
            let mut requests = self.requests.lock().unwrap();
            let call = requests.len();
            requests.push(request.clone());

            match self.script.get(call) {
                Some(Ok(content)) => Ok(ChatResponse {
                    content: content.clone(),
                    model: request.model.clone(),
                    usage: LlmUsage::default(),
                }),
                Some(Err(e)) => Err(AppError::Llm(e.to_string())),
                None => Err(AppError::Llm("Unexpected extra completion call".to_string())),
            }
        }
    }

    #[derive(Debug)]
    struct FixedEmbedder;

    #[async_trait::async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        fn provider_name(&self) -> &str {
            "fixed"
        }
        fn model_name(&self) -> &str {
            "fixed-v1"
        }
        fn dimensions(&self) -> usize {
            2
        }
        async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            "remote work productivity",
            "blog",
            "professional",
            "startup founders",
        )
        .with_key_points("async communication, deep work blocks")
    }

    fn pipeline_without_index(client: Arc<RecordingClient>) -> ContentPipeline {
        let retriever = KnowledgeRetriever::without_index(Arc::new(FixedEmbedder));
        ContentPipeline::new(client, retriever)
    }

    fn system_prompt(request: &ChatRequest) -> &str {
        assert_eq!(request.messages[0].role, Role::System);
        &request.messages[0].content
    }

    fn user_prompt(request: &ChatRequest) -> &str {
        request.last_user_content().unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_success() {
        let client = Arc::new(RecordingClient::four_stages());
        let pipeline = pipeline_without_index(client.clone());

        let outcome = pipeline.run(&request()).await;

        assert!(outcome.success);
        assert_eq!(outcome.content.as_deref(), Some("FINAL-OUTPUT"));
        assert_eq!(outcome.ideas.as_deref(), Some("IDEAS-OUTPUT"));
        assert_eq!(outcome.research.as_deref(), Some("RESEARCH-OUTPUT"));
        assert_eq!(
            outcome.workflow_steps,
            vec!["ideation", "research", "content_creation", "editing"]
        );
        assert!(outcome.error.is_none());
        assert_eq!(client.recorded().len(), 4);
    }

    #[tokio::test]
    async fn test_stage_outputs_thread_verbatim() {
        let client = Arc::new(RecordingClient::four_stages());
        let pipeline = pipeline_without_index(client.clone());

        pipeline.run(&request()).await;

        let recorded = client.recorded();
        assert_eq!(recorded.len(), 4);

        // Research prompt embeds the ideation output
        assert!(user_prompt(&recorded[1]).contains("IDEAS-OUTPUT"));
        // Draft prompt embeds both ideation and research outputs
        assert!(user_prompt(&recorded[2]).contains("IDEAS-OUTPUT"));
        assert!(user_prompt(&recorded[2]).contains("RESEARCH-OUTPUT"));
        // Edit prompt embeds the draft
        assert!(user_prompt(&recorded[3]).contains("DRAFT-OUTPUT"));
    }

    #[tokio::test]
    async fn test_missing_tone_fails_before_any_call() {
        let client = Arc::new(RecordingClient::four_stages());
        let pipeline = pipeline_without_index(client.clone());

        let mut request = request();
        request.tone = String::new();

        let outcome = pipeline.run(&request).await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("tone"));
        assert!(outcome.workflow_steps.is_empty());
        assert_eq!(client.recorded().len(), 0);
    }

    #[tokio::test]
    async fn test_zero_match_retrieval_omits_knowledge_section() {
        let client = Arc::new(RecordingClient::four_stages());
        // Index exists but holds nothing for this workspace
        let index = Arc::new(MemoryIndex::new());
        let retriever = KnowledgeRetriever::new(Arc::new(FixedEmbedder), index);
        let pipeline = ContentPipeline::new(client.clone(), retriever);

        let outcome = pipeline.run(&request().with_workspace_id("ws-1")).await;

        assert!(outcome.success);
        assert_eq!(
            outcome.workflow_steps,
            vec!["ideation", "research", "content_creation", "editing"]
        );
        for recorded in client.recorded() {
            assert!(!system_prompt(&recorded).contains("Knowledge Context:"));
        }
    }

    #[tokio::test]
    async fn test_retrieved_knowledge_reaches_every_agent() {
        let client = Arc::new(RecordingClient::four_stages());
        let index = Arc::new(MemoryIndex::new());
        index
            .upsert(
                "d1",
                &[1.0, 0.0],
                serde_json::json!({
                    "text": "Deep work sessions doubled output",
                    "workspace_id": "ws-1",
                }),
            )
            .await
            .unwrap();

        let retriever = KnowledgeRetriever::new(Arc::new(FixedEmbedder), index);
        let pipeline = ContentPipeline::new(client.clone(), retriever);

        let outcome = pipeline.run(&request().with_workspace_id("ws-1")).await;
        assert!(outcome.success);

        for recorded in client.recorded() {
            let system = system_prompt(&recorded);
            assert!(system.contains("Knowledge Context:"));
            assert!(system.contains("Deep work sessions doubled output"));
        }
    }

    #[tokio::test]
    async fn test_brand_context_attached_after_knowledge() {
        let client = Arc::new(RecordingClient::four_stages());
        let index = Arc::new(MemoryIndex::new());
        index
            .upsert(
                "d1",
                &[1.0, 0.0],
                serde_json::json!({"text": "a snippet", "workspace_id": "ws-1"}),
            )
            .await
            .unwrap();

        let retriever = KnowledgeRetriever::new(Arc::new(FixedEmbedder), index);
        let pipeline = ContentPipeline::new(client.clone(), retriever);

        let profile = BrandProfile {
            name: "Acme".to_string(),
            voice: "Bold".to_string(),
            guidelines: Some(BrandGuidelines::parse(r#"{"keyMessages": "Ship fast"}"#)),
        };

        let outcome = pipeline
            .run(
                &request()
                    .with_workspace_id("ws-1")
                    .with_brand_profile(profile),
            )
            .await;
        assert!(outcome.success);

        let system = system_prompt(&client.recorded()[0]).to_string();
        let knowledge_at = system.find("a snippet").unwrap();
        let brand_at = system.find("Brand Name: Acme").unwrap();
        assert!(knowledge_at < brand_at);
        assert!(system.contains("Key Messages: Ship fast"));
    }

    #[tokio::test]
    async fn test_failure_mid_chain_discards_partial_outputs() {
        let client = Arc::new(RecordingClient::scripted(vec![
            Ok("IDEAS-OUTPUT".to_string()),
            Err(AppError::Llm("rate limited".to_string())),
        ]));
        let pipeline = pipeline_without_index(client.clone());

        let outcome = pipeline.run(&request()).await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("rate limited"));
        // Ideation already ran, but its output is not surfaced
        assert!(outcome.ideas.is_none());
        assert!(outcome.content.is_none());
        // The chain stopped after the failing stage
        assert_eq!(client.recorded().len(), 2);
    }

    #[tokio::test]
    async fn test_outcome_serialization_shape() {
        let client = Arc::new(RecordingClient::four_stages());
        let pipeline = pipeline_without_index(client);

        let outcome = pipeline.run(&request()).await;
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["content"], "FINAL-OUTPUT");
        assert_eq!(json["workflow_steps"][2], "content_creation");
        assert!(json.get("error").is_none());
    }
}
