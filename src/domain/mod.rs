mod assistant;
mod chat_message;
mod chat_thread;
mod message_id;
mod message_role;
mod prompt;
mod thread_id;
mod user_profile;

pub use assistant::{Assistant, AssistantSort, RemoteAssistant, RemoteTool};
pub use chat_message::ChatMessage;
pub use chat_thread::ChatThread;
pub use message_id::MessageId;
pub use message_role::MessageRole;
pub use prompt::{Prompt, PromptDraft, PromptFilter, PromptUpdate, PromptValidationError};
pub use thread_id::ThreadId;
pub use user_profile::{DEFAULT_OWNER_NAME, UserProfile};
