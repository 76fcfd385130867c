use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    GenerationError, ReplyRequest, ReplyTokenStream, ResponseGenerator,
};
use crate::domain::MessageRole;
use crate::infrastructure::observability::sanitize_prompt;

/// Answers through an OpenAI-compatible `/chat/completions` endpoint, either
/// the upstream API or this server's own relay.
pub struct ChatCompletionsResponder {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct ChatCompletionChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsResponder {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>, model: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            model: model.to_string(),
        }
    }

    fn build_messages(&self, request: &ReplyRequest) -> Vec<WireMessage> {
        let mut messages = vec![WireMessage {
            role: "system".to_string(),
            content: format!(
                "You are {}, a helpful workplace assistant. Answer clearly and concisely.",
                request.assistant_name
            ),
        }];
        messages.extend(request.history.iter().map(|m| WireMessage {
            role: m.role.as_str().to_string(),
            content: m.content.clone(),
        }));
        messages.push(WireMessage {
            role: MessageRole::User.as_str().to_string(),
            content: request.message.clone(),
        });
        messages
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn post(
        &self,
        request: &ReplyRequest,
        stream: bool,
    ) -> Result<reqwest::Response, GenerationError> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: self.build_messages(request),
            stream: stream.then_some(true),
        };

        tracing::debug!(
            prompt = %sanitize_prompt(&request.message),
            history = request.history.len(),
            stream,
            "Requesting chat completion"
        );

        let builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        let response = self
            .apply_auth(builder)
            .send()
            .await
            .map_err(|e| GenerationError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GenerationError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl ResponseGenerator for ChatCompletionsResponder {
    #[tracing::instrument(skip(self, request), fields(assistant = %request.assistant_name, model = %self.model))]
    async fn generate(&self, request: &ReplyRequest) -> Result<String, GenerationError> {
        let response = self.post(request, false).await?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::InvalidResponse("empty choices".to_string()))
    }

    async fn generate_stream(
        &self,
        request: &ReplyRequest,
    ) -> Result<ReplyTokenStream, GenerationError> {
        let response = self.post(request, true).await?;
        let mut bytes = response.bytes_stream();

        let tokens = async_stream::stream! {
            let mut buffer = String::new();
            'read: while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(GenerationError::ApiRequestFailed(e.to_string()));
                        break;
                    }
                };
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(newline) = buffer.find('\n') {
                    let line: String = buffer.drain(..=newline).collect();
                    let Some(data) = line.trim().strip_prefix("data:") else {
                        continue;
                    };
                    let data = data.trim();
                    if data == "[DONE]" {
                        break 'read;
                    }
                    match serde_json::from_str::<ChatCompletionChunk>(data) {
                        Ok(parsed) => {
                            if let Some(content) = parsed
                                .choices
                                .into_iter()
                                .next()
                                .and_then(|choice| choice.delta.content)
                            {
                                yield Ok(content);
                            }
                        }
                        Err(e) => tracing::warn!(error = %e, "Skipping malformed stream chunk"),
                    }
                }
            }
        };

        Ok(Box::pin(tokens))
    }
}
