//! Stage prompt templates.
//!
//! Handlebars templates for the four stage user prompts. Escaping is
//! disabled so previous stage outputs are interpolated verbatim; stage N's
//! template always embeds stage N-1's full output.

use crate::request::GenerationRequest;
use draftsmith_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

const IDEATION_TEMPLATE: &str = "\
Create content ideas for a {{content_type}} about \"{{topic}}\" targeting {{target_audience}}.
The tone should be {{tone}}.
{{#if key_points}}Include these key points: {{key_points}}
{{/if}}
Provide 3-5 creative approaches to this topic.";

const RESEARCH_TEMPLATE: &str = "\
Research the topic: \"{{topic}}\" for a {{content_type}} targeting {{target_audience}}.

Use these content ideas as a guide:
{{ideas}}

Provide key facts, statistics, insights, and analysis that would support creating
compelling content on this topic.";

const DRAFT_TEMPLATE: &str = "\
Create a {{content_type}} about \"{{topic}}\" for {{target_audience}} with a {{tone}} tone.

Use these ideas as inspiration:
{{ideas}}

And incorporate this research:
{{research}}

{{#if key_points}}Make sure to include these key points: {{key_points}}

{{/if}}Format the content appropriately for a {{content_type}}, including headlines,
subheadings, and proper structure. Use HTML formatting for the structure.";

const EDIT_TEMPLATE: &str = "\
Review and improve this {{content_type}} content:

{{draft}}

Make sure it:
- Has a {{tone}} tone appropriate for {{target_audience}}
- Is well-structured and engaging
- Has a strong headline and clear subheadings
- Includes all necessary key points
- Is free of grammar and spelling errors
- Maintains HTML formatting";

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping; stage outputs must flow through verbatim
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

fn base_variables(request: &GenerationRequest) -> HashMap<String, String> {
    let mut variables = HashMap::new();
    variables.insert("topic".to_string(), request.topic.clone());
    variables.insert("content_type".to_string(), request.content_type.clone());
    variables.insert("tone".to_string(), request.tone.clone());
    variables.insert(
        "target_audience".to_string(),
        request.target_audience.clone(),
    );
    if let Some(key_points) = &request.key_points {
        variables.insert("key_points".to_string(), key_points.clone());
    }
    variables
}

/// User prompt for the ideation stage.
pub fn ideation_prompt(request: &GenerationRequest) -> AppResult<String> {
    render_template(IDEATION_TEMPLATE, &base_variables(request))
}

/// User prompt for the research stage; embeds the ideation output.
pub fn research_prompt(request: &GenerationRequest, ideas: &str) -> AppResult<String> {
    let mut variables = base_variables(request);
    variables.insert("ideas".to_string(), ideas.to_string());
    render_template(RESEARCH_TEMPLATE, &variables)
}

/// User prompt for the drafting stage; embeds ideation and research output.
pub fn draft_prompt(
    request: &GenerationRequest,
    ideas: &str,
    research: &str,
) -> AppResult<String> {
    let mut variables = base_variables(request);
    variables.insert("ideas".to_string(), ideas.to_string());
    variables.insert("research".to_string(), research.to_string());
    render_template(DRAFT_TEMPLATE, &variables)
}

/// User prompt for the editing stage; embeds the full draft.
pub fn edit_prompt(request: &GenerationRequest, draft: &str) -> AppResult<String> {
    let mut variables = base_variables(request);
    variables.insert("draft".to_string(), draft.to_string());
    render_template(EDIT_TEMPLATE, &variables)
}
