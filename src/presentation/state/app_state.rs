use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{
    AssistantCatalog, ChatSessionManager, PreferencesService, PromptStore,
};
use crate::infrastructure::proxy::UpstreamRelay;
use crate::presentation::config::BrandingSettings;

#[derive(Clone)]
pub struct AppState {
    pub chat_sessions: Arc<ChatSessionManager>,
    pub prompt_store: Arc<PromptStore>,
    pub assistant_catalog: Arc<AssistantCatalog>,
    pub preferences: Arc<PreferencesService>,
    pub relay: Arc<UpstreamRelay>,
    pub branding: BrandingSettings,
    /// Polling period of the current-thread watch stream.
    pub watch_interval: Duration,
}
