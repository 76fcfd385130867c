use async_trait::async_trait;

use crate::domain::RemoteAssistant;

/// Read access to assistants defined on the upstream AI platform.
#[async_trait]
pub trait AssistantDirectory: Send + Sync {
    async fn list_assistants(&self) -> Result<Vec<RemoteAssistant>, AssistantDirectoryError>;

    async fn get_assistant(&self, id: &str) -> Result<RemoteAssistant, AssistantDirectoryError>;

    async fn test_connection(&self) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantDirectoryError {
    #[error("OpenAI API key not configured")]
    NotConfigured,
    #[error("{message}")]
    Upstream { status: u16, message: String },
    #[error(
        "Cannot connect to OpenAI API directly. Route requests through the /api/openai relay instead: {0}"
    )]
    Unreachable(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
