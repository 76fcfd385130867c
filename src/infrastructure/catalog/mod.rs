mod builtin_assistants;
mod fallback_prompts;

pub use builtin_assistants::builtin_assistants;
pub use fallback_prompts::fallback_prompts;
