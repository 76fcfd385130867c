use std::time::Duration;

use async_trait::async_trait;
use futures::stream;
use rand::Rng;
use rand::seq::SliceRandom;

use super::canned_responses::candidate_replies;
use crate::application::ports::{
    GenerationError, ReplyRequest, ReplyTokenStream, ResponseGenerator,
};

/// Offline stand-in for a model: waits a moment, then answers with a
/// prepared reply chosen by assistant and message keywords.
pub struct CannedResponder {
    min_delay: Duration,
    max_delay: Duration,
    chunk_delay: Duration,
}

impl CannedResponder {
    pub fn new(min_delay: Duration, max_delay: Duration, chunk_delay: Duration) -> Self {
        Self {
            min_delay,
            max_delay: max_delay.max(min_delay),
            chunk_delay,
        }
    }

    /// No artificial delays at all.
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    fn pick(&self, request: &ReplyRequest) -> Result<(String, Duration), GenerationError> {
        let replies = candidate_replies(&request.assistant_name, &request.message);
        let mut rng = rand::thread_rng();
        let reply = replies
            .choose(&mut rng)
            .cloned()
            .ok_or_else(|| GenerationError::InvalidResponse("no canned reply".to_string()))?;

        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        let delay = Duration::from_millis(rng.gen_range(min..=max));
        Ok((reply, delay))
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(1000),
            Duration::from_millis(3000),
            Duration::from_millis(30),
        )
    }
}

#[async_trait]
impl ResponseGenerator for CannedResponder {
    #[tracing::instrument(skip(self, request), fields(assistant = %request.assistant_name))]
    async fn generate(&self, request: &ReplyRequest) -> Result<String, GenerationError> {
        let (reply, delay) = self.pick(request)?;
        tokio::time::sleep(delay).await;
        Ok(reply)
    }

    async fn generate_stream(
        &self,
        request: &ReplyRequest,
    ) -> Result<ReplyTokenStream, GenerationError> {
        let (reply, delay) = self.pick(request)?;
        tokio::time::sleep(delay).await;

        let words: Vec<String> = reply.split_inclusive(' ').map(String::from).collect();
        let chunk_delay = self.chunk_delay;

        let tokens = stream::unfold(words.into_iter(), move |mut words| async move {
            let word = words.next()?;
            if !chunk_delay.is_zero() {
                tokio::time::sleep(chunk_delay).await;
            }
            Some((Ok(word), words))
        });

        Ok(Box::pin(tokens))
    }
}
