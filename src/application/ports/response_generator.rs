use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::domain::ChatMessage;

pub type ReplyTokenStream = Pin<Box<dyn Stream<Item = Result<String, GenerationError>> + Send>>;

/// What a generator needs to know to answer one turn.
#[derive(Debug, Clone)]
pub struct ReplyRequest {
    pub assistant_id: String,
    pub assistant_name: String,
    pub message: String,
    /// Finished messages before this turn, oldest first.
    pub history: Vec<ChatMessage>,
}

#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, request: &ReplyRequest) -> Result<String, GenerationError>;

    /// Reply as a sequence of text deltas.
    async fn generate_stream(
        &self,
        request: &ReplyRequest,
    ) -> Result<ReplyTokenStream, GenerationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("OpenAI API key not configured")]
    NotConfigured,
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
