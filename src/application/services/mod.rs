mod assistant_catalog;
mod chat_session;
mod preferences;
mod prompt_store;
mod reply_stream;

pub use assistant_catalog::AssistantCatalog;
pub use chat_session::{ChatSessionError, ChatSessionManager, THREADS_KEY};
pub use preferences::{API_KEY_KEY, PROFILE_KEY, PreferencesError, PreferencesService};
pub use prompt_store::{ConnectionInfo, ConnectionSummary, PromptStore};
pub use reply_stream::{CancelHandle, ReplyEvent, ReplyStream};
