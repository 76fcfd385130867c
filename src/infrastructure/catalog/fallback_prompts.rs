use crate::domain::Prompt;

const FALLBACK_PROMPTS_JSON: &str = include_str!("fallback_prompts.json");

/// The built-in prompt list served when no document store is reachable.
pub fn fallback_prompts() -> Vec<Prompt> {
    match serde_json::from_str::<Vec<Prompt>>(FALLBACK_PROMPTS_JSON) {
        Ok(prompts) => prompts,
        Err(e) => {
            tracing::error!(error = %e, "Built-in prompt list is unreadable");
            Vec::new()
        }
    }
}
