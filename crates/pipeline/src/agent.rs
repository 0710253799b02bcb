//! Agent configuration and execution.
//!
//! An agent is a configured role: a base instruction, a model and
//! temperature, and optional custom instructions, knowledge context, and
//! few-shot examples. The configuration is built once via consuming
//! `with_*` setters and then passed by value; nothing mutates it after
//! construction.

use draftsmith_core::AppResult;
use draftsmith_llm::{ChatMessage, ChatRequest, LlmClient};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One few-shot example pair attached to an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptExample {
    pub input: String,
    pub output: String,
}

impl PromptExample {
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }
}

/// A configured agent role.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Role name, for logging
    pub name: String,

    /// Base instruction text
    pub instructions: String,

    /// Completion model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Optional custom instructions appended to the base text
    pub custom_instructions: Option<String>,

    /// Optional knowledge/brand context appended after custom instructions
    pub knowledge_context: Option<String>,

    /// Ordered few-shot examples
    pub examples: Vec<PromptExample>,
}

impl AgentConfig {
    /// Create an agent with required fields and no optional context.
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            model: model.into(),
            temperature,
            custom_instructions: None,
            knowledge_context: None,
            examples: Vec::new(),
        }
    }

    /// Attach custom instructions.
    pub fn with_custom_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.custom_instructions = Some(instructions.into());
        self
    }

    /// Attach knowledge context.
    pub fn with_knowledge_context(mut self, context: impl Into<String>) -> Self {
        self.knowledge_context = Some(context.into());
        self
    }

    /// Attach few-shot examples.
    pub fn with_examples(mut self, examples: Vec<PromptExample>) -> Self {
        self.examples = examples;
        self
    }

    /// Override the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Compose the complete system prompt.
    ///
    /// Deterministic, fixed order: base instructions, then custom
    /// instructions, then knowledge context, then examples. Sections are
    /// present only when their source field is non-empty.
    pub fn system_prompt(&self) -> String {
        let mut prompt = self.instructions.clone();

        if let Some(custom) = self
            .custom_instructions
            .as_deref()
            .filter(|s| !s.is_empty())
        {
            prompt.push_str("\n\nCustom Instructions:\n");
            prompt.push_str(custom);
        }

        if let Some(context) = self.knowledge_context.as_deref().filter(|s| !s.is_empty()) {
            prompt.push_str("\n\nKnowledge Context:\n");
            prompt.push_str(context);
        }

        if !self.examples.is_empty() {
            prompt.push_str("\n\nExamples:");
            for example in &self.examples {
                prompt.push_str(&format!(
                    "\n\nInput: {}\nOutput: {}",
                    example.input, example.output
                ));
            }
        }

        prompt
    }

    /// Execute the agent against a completion client.
    ///
    /// Builds the message sequence (system prompt, prior-turn history
    /// verbatim and in order, then the new user message) and sends one
    /// completion request at the configured model and temperature.
    /// Provider failures propagate as `AppResult` errors.
    pub async fn execute(
        &self,
        client: &dyn LlmClient,
        user_message: &str,
        history: &[ChatMessage],
    ) -> AppResult<String> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(self.system_prompt()));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(user_message));

        debug!(agent = %self.name, model = %self.model, "Executing agent");

        let request =
            ChatRequest::new(&self.model, messages).with_temperature(self.temperature);

        let response = client.complete(&request).await?;
        Ok(response.content)
    }
}
