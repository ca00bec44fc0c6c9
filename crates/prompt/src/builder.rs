//! Prompt builder for rendering the grounding templates.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, Grounding, PromptSet};
use assistant_core::{AppError, AppResult};
use handlebars::Handlebars;
use serde_json::json;

/// Build the system/user prompt pair for a query.
///
/// `context` selects the branch: `Some` renders the grounded template with the
/// evidence block, `None` renders the ungrounded template that asks the model
/// to admit it found nothing.
///
/// # Example
/// ```no_run
/// use assistant_prompt::{build_prompt, PromptSet};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let built = build_prompt(&PromptSet::default(), "What is eduroam?", None)?;
/// println!("User prompt: {}", built.user);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(set: &PromptSet, query: &str, context: Option<&str>) -> AppResult<BuiltPrompt> {
    let grounding = if context.is_some() {
        Grounding::Grounded
    } else {
        Grounding::Ungrounded
    };

    tracing::debug!(prompt_id = %set.id, ?grounding, "Building prompt");

    let variables = json!({
        "query": query,
        "context": context.unwrap_or_default(),
        "topics": set.topics.join(", "),
    });

    let template = match grounding {
        Grounding::Grounded => &set.grounded,
        Grounding::Ungrounded => &set.ungrounded,
    };

    let system = render_template(&set.system, &variables)?;
    let user = render_template(template, &variables)?;

    Ok(BuiltPrompt {
        system,
        user,
        metadata: BuiltPromptMetadata {
            source_prompt_id: set.id.clone(),
            grounding,
        },
    })
}

/// Render a Handlebars template with variables.
pub(crate) fn render_template(template: &str, variables: &serde_json::Value) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}
