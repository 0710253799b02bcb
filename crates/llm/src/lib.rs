//! LLM integration crate for the Draftsmith pipeline.
//!
//! This crate provides a provider-agnostic abstraction for chat-style
//! text completions. Clients are explicitly constructed and injected into
//! the pipeline, so tests can substitute deterministic fakes.
//!
//! # Providers
//! - **OpenAI**: chat completions API (default)
//! - **Mock**: deterministic offline provider for tests and local dev
//!
//! # Example
//! ```no_run
//! use draftsmith_llm::{ChatMessage, ChatRequest, LlmClient, providers::OpenAiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new("sk-...");
//! let request = ChatRequest::new("gpt-4o", vec![ChatMessage::user("Hello!")]);
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

// Re-export main types
pub use client::{ChatMessage, ChatRequest, ChatResponse, LlmClient, LlmUsage, Role};
pub use factory::create_client;
pub use providers::{MockClient, OpenAiClient};
