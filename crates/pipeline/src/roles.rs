//! Preset agent roles for the content pipeline.
//!
//! Each constructor builds the role's base instruction and applies any
//! workspace-level overrides (custom instructions, examples, model,
//! temperature) on top of the configured defaults.

use crate::agent::{AgentConfig, PromptExample};
use serde::{Deserialize, Serialize};

const IDEATION_INSTRUCTIONS: &str = "\
You are an expert content ideation specialist. Your role is to generate creative,
engaging, and original content ideas based on the provided topic and target audience.

Focus on:
- Creating original angles and approaches
- Understanding audience needs and interests
- Aligning ideas with marketing goals
- Considering SEO and discoverability

For each idea, provide:
1. A compelling headline
2. A brief description (2-3 sentences)
3. Key points to include
4. Target keywords";

const RESEARCH_INSTRUCTIONS: &str = "\
You are an expert content researcher. Your role is to gather relevant information,
facts, statistics, and insights on a given topic to support content creation.

Focus on:
- Finding key facts and statistics
- Identifying common questions and pain points
- Analyzing the topic from different perspectives
- Providing context and background information

Your research should be:
1. Accurate and fact-based
2. Well-structured and organized
3. Relevant to the target audience
4. Comprehensive yet concise";

const WRITER_INSTRUCTIONS: &str = "\
You are an expert content writer. Your role is to create high-quality,
engaging content based on the provided outline and research.

Focus on:
- Clear, concise writing with a consistent tone
- Strong headlines and subheadings
- Engaging introductions and conclusions
- Incorporating SEO best practices naturally
- Adding appropriate calls-to-action

Your content should be:
1. Well-structured and easy to navigate
2. Optimized for the specified audience
3. Formatted properly for the content type
4. Written in the requested tone and style

Use HTML formatting for structure where appropriate.";

const EDITOR_INSTRUCTIONS: &str = "\
You are an expert content editor. Your role is to refine and improve content
while maintaining the original voice and intent.

Focus on:
- Correcting grammar and spelling
- Improving clarity and flow
- Ensuring consistent tone and style
- Optimizing for readability
- Fact-checking and accuracy

Your edits should:
1. Preserve the original meaning and intent
2. Maintain the author's voice
3. Improve structure and organization
4. Enhance overall quality and professionalism

Maintain HTML formatting where present.";

/// Workspace-level customization for one role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentOverrides {
    /// Custom instructions appended to the role's base prompt
    pub instructions: Option<String>,

    /// Few-shot examples
    #[serde(default)]
    pub examples: Vec<PromptExample>,

    /// Model override
    pub model: Option<String>,

    /// Temperature override
    pub temperature: Option<f32>,
}

/// Per-role override set for a whole pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleOverrides {
    pub ideation: Option<AgentOverrides>,
    pub research: Option<AgentOverrides>,
    pub writer: Option<AgentOverrides>,
    pub editor: Option<AgentOverrides>,
}

fn apply_overrides(mut agent: AgentConfig, overrides: Option<&AgentOverrides>) -> AgentConfig {
    let Some(overrides) = overrides else {
        return agent;
    };

    if let Some(instructions) = &overrides.instructions {
        agent = agent.with_custom_instructions(instructions.clone());
    }
    if !overrides.examples.is_empty() {
        agent = agent.with_examples(overrides.examples.clone());
    }
    if let Some(model) = &overrides.model {
        agent = agent.with_model(model.clone());
    }
    if let Some(temperature) = overrides.temperature {
        agent = agent.with_temperature(temperature);
    }

    agent
}

/// Agent specialized for content ideation.
pub fn ideation_agent(
    model: &str,
    temperature: f32,
    overrides: Option<&AgentOverrides>,
) -> AgentConfig {
    apply_overrides(
        AgentConfig::new("IdeationAgent", IDEATION_INSTRUCTIONS, model, temperature),
        overrides,
    )
}

/// Agent specialized for topic research.
pub fn research_agent(
    model: &str,
    temperature: f32,
    overrides: Option<&AgentOverrides>,
) -> AgentConfig {
    apply_overrides(
        AgentConfig::new("ResearchAgent", RESEARCH_INSTRUCTIONS, model, temperature),
        overrides,
    )
}

/// Agent specialized for drafting content.
pub fn writer_agent(
    model: &str,
    temperature: f32,
    overrides: Option<&AgentOverrides>,
) -> AgentConfig {
    apply_overrides(
        AgentConfig::new("ContentAgent", WRITER_INSTRUCTIONS, model, temperature),
        overrides,
    )
}

/// Agent specialized for editing and polish.
pub fn editor_agent(
    model: &str,
    temperature: f32,
    overrides: Option<&AgentOverrides>,
) -> AgentConfig {
    apply_overrides(
        AgentConfig::new("EditorAgent", EDITOR_INSTRUCTIONS, model, temperature),
        overrides,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_use_configured_defaults() {
        let agent = ideation_agent("gpt-4o", 0.7, None);
        assert_eq!(agent.name, "IdeationAgent");
        assert_eq!(agent.model, "gpt-4o");
        assert_eq!(agent.temperature, 0.7);
        assert!(agent.custom_instructions.is_none());
    }

    #[test]
    fn test_each_role_has_distinct_instructions() {
        let prompts: Vec<String> = [
            ideation_agent("m", 0.7, None),
            research_agent("m", 0.7, None),
            writer_agent("m", 0.7, None),
            editor_agent("m", 0.7, None),
        ]
        .iter()
        .map(|a| a.system_prompt())
        .collect();

        for (i, a) in prompts.iter().enumerate() {
            for b in prompts.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_overrides_applied() {
        let overrides = AgentOverrides {
            instructions: Some("Always write in Spanish.".to_string()),
            examples: vec![PromptExample::new("in", "out")],
            model: Some("gpt-4o-mini".to_string()),
            temperature: Some(0.3),
        };

        let agent = editor_agent("gpt-4o", 0.7, Some(&overrides));
        assert_eq!(agent.model, "gpt-4o-mini");
        assert_eq!(agent.temperature, 0.3);
        assert_eq!(agent.examples.len(), 1);

        let prompt = agent.system_prompt();
        assert!(prompt.contains("Custom Instructions:\nAlways write in Spanish."));
    }

    #[test]
    fn test_partial_overrides_keep_defaults() {
        let overrides = AgentOverrides {
            temperature: Some(0.9),
            ..Default::default()
        };

        let agent = research_agent("gpt-4o", 0.7, Some(&overrides));
        assert_eq!(agent.model, "gpt-4o");
        assert_eq!(agent.temperature, 0.9);
    }
}
