//! Multi-agent content generation pipeline.
//!
//! A fixed sequential chain of four LLM-backed roles: ideation, research,
//! drafting, and editing, each receiving the accumulated context plus the
//! previous stage's output verbatim. The orchestrator owns validation,
//! context assembly, and stage sequencing; all external clients are
//! injected, so the whole chain runs against fakes in tests.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use draftsmith_knowledge::{embeddings, KnowledgeRetriever};
//! use draftsmith_llm::providers::MockClient;
//! use draftsmith_pipeline::{ContentPipeline, GenerationRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = Arc::new(MockClient::new());
//! let embedder =
//!     embeddings::create_provider("mock", "trigram-v1", 1536, None, 3, Duration::from_secs(30))?;
//! let retriever = KnowledgeRetriever::without_index(embedder);
//!
//! let pipeline = ContentPipeline::new(llm, retriever);
//! let request = GenerationRequest::new("remote work", "blog", "professional", "founders");
//! let outcome = pipeline.run(&request).await;
//! assert!(outcome.success);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod brand;
pub mod context;
pub mod prompts;
pub mod request;
pub mod roles;
pub mod workflow;

pub use agent::{AgentConfig, PromptExample};
pub use brand::{brand_context, BrandGuidelines, BrandProfile};
pub use request::GenerationRequest;
pub use roles::{AgentOverrides, RoleOverrides};
pub use workflow::{ContentPipeline, PipelineOutcome, WORKFLOW_STEPS};
