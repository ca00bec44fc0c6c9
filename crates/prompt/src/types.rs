//! Prompt types for the knowledge assistant.

use serde::{Deserialize, Serialize};

const DEFAULT_SYSTEM: &str = "You are the GÉANT Knowledge Assistant, a helpful assistant that answers questions about GÉANT, the pan-European research and education network.

RULES:
1. When context from GÉANT documents is provided, answer using ONLY that context.
2. When no context is provided, politely explain that the GÉANT knowledge base has no relevant information for this question. Do not invent an answer.
3. In that case, suggest rephrasing the question or asking about topics you can help with ({{topics}}).
4. Be accurate and factual. NEVER make up information.
5. Reference the sources whenever your answer uses the provided context.
6. Keep answers concise, factual and conversational.";

const DEFAULT_GROUNDED: &str = "Context from GÉANT documents:
{{context}}

User Question: {{query}}

Answer the question using ONLY the context above. If the context only partially covers the question, say what you found and note what is missing.";

const DEFAULT_UNGROUNDED: &str = "User Question: {{query}}

IMPORTANT: No relevant documents were found in the GÉANT knowledge base for this question. Politely tell the user that you could not find information to answer it, and suggest they rephrase or ask about topics the documents typically cover ({{topics}}). Keep a helpful, conversational tone.";

/// The set of templates used to ground a completion.
///
/// Templates use Handlebars syntax with the variables `query`, `context`
/// (grounded template only) and `topics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptSet {
    /// Identifier recorded in built prompt metadata
    pub id: String,

    /// System prompt shared by both branches
    pub system: String,

    /// User prompt when evidence was retrieved
    pub grounded: String,

    /// User prompt when retrieval found nothing above threshold
    pub ungrounded: String,

    /// Representative topics suggested when nothing matched
    pub topics: Vec<String>,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            id: "assistant.rag.default".to_string(),
            system: DEFAULT_SYSTEM.to_string(),
            grounded: DEFAULT_GROUNDED.to_string(),
            ungrounded: DEFAULT_UNGROUNDED.to_string(),
            topics: [
                "network technologies",
                "eduGAIN",
                "eduroam",
                "cybersecurity",
                "NREN services",
                "project reports",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
        }
    }
}

/// Which user template a prompt was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grounding {
    Grounded,
    Ungrounded,
}

/// A fully built system/user prompt pair ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    pub system: String,

    pub user: String,

    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt set ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    pub grounding: Grounding,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt_set_covers_rules() {
        let set = PromptSet::default();
        assert!(set.system.contains("ONLY that context"));
        assert!(set.system.contains("Do not invent"));
        assert!(set.system.contains("NEVER make up"));
        assert!(set.system.contains("Reference the sources"));
        assert!(set.system.contains("concise"));
        assert!(set.grounded.contains("{{context}}"));
        assert!(set.grounded.contains("{{query}}"));
        assert!(!set.ungrounded.contains("{{context}}"));
        assert!(set.topics.iter().any(|t| t == "eduroam"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
id: custom.prompts
topics:
  - eduroam
  - eduGAIN
"#;
        let set: PromptSet = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(set.id, "custom.prompts");
        assert_eq!(set.topics, vec!["eduroam", "eduGAIN"]);
        assert_eq!(set.system, PromptSet::default().system);
    }
}
