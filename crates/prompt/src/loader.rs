//! Loader for prompt set overrides.

use crate::builder::render_template;
use crate::types::PromptSet;
use assistant_core::{AppError, AppResult};
use std::path::Path;

/// Load a prompt set from a YAML file.
///
/// Fields missing from the file keep their built-in defaults, so an override
/// file may replace just the topic list or a single template.
///
/// # Example
/// ```no_run
/// use assistant_prompt::load_prompt_set;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompts = load_prompt_set(Path::new("prompts.yaml"))?;
/// println!("Loaded prompt set: {}", prompts.id);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt_set(path: &Path) -> AppResult<PromptSet> {
    tracing::debug!("Loading prompt set from: {:?}", path);

    if !path.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            path
        )));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Prompt(format!("Failed to read prompt file {:?}: {}", path, e))
    })?;

    let set: PromptSet = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {:?}: {}", path, e))
    })?;

    validate_prompt_set(&set)?;

    tracing::info!("Loaded prompt set: {}", set.id);

    Ok(set)
}

/// Validate that every template parses and references the variables it needs.
pub fn validate_prompt_set(set: &PromptSet) -> AppResult<()> {
    if set.id.trim().is_empty() {
        return Err(AppError::Prompt("Prompt set ID cannot be empty".to_string()));
    }

    if !set.grounded.contains("{{context}}") {
        return Err(AppError::Prompt(format!(
            "Grounded template in '{}' must reference {{{{context}}}}",
            set.id
        )));
    }

    for (name, template) in [("grounded", &set.grounded), ("ungrounded", &set.ungrounded)] {
        if !template.contains("{{query}}") {
            return Err(AppError::Prompt(format!(
                "{} template in '{}' must reference {{{{query}}}}",
                name, set.id
            )));
        }
    }

    let sample = serde_json::json!({"query": "", "context": "", "topics": ""});
    for template in [&set.system, &set.grounded, &set.ungrounded] {
        render_template(template, &sample)?;
    }

    Ok(())
}
