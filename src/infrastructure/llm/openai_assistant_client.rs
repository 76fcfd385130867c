use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::application::ports::{AssistantDirectory, AssistantDirectoryError};
use crate::domain::RemoteAssistant;

const ASSISTANTS_BETA: &str = "assistants=v2";

/// Assistants API client.
pub struct OpenAiAssistantClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct AssistantList {
    #[serde(default)]
    data: Vec<RemoteAssistant>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiAssistantClient {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, AssistantDirectoryError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AssistantDirectoryError::NotConfigured)?;

        let response = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(api_key)
            .header("OpenAI-Beta", ASSISTANTS_BETA)
            .send()
            .await
            .map_err(|e| AssistantDirectoryError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| AssistantDirectoryError::InvalidResponse(e.to_string()))
    }
}

async fn upstream_error(response: Response) -> AssistantDirectoryError {
    let status = response.status();
    let message = match response.json::<ErrorEnvelope>().await {
        Ok(envelope) => envelope.error.message,
        Err(_) => format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error")
        ),
    };
    AssistantDirectoryError::Upstream {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl AssistantDirectory for OpenAiAssistantClient {
    #[tracing::instrument(skip(self))]
    async fn list_assistants(&self) -> Result<Vec<RemoteAssistant>, AssistantDirectoryError> {
        let list: AssistantList = self
            .request(Method::GET, "/assistants?limit=100")
            .await?;
        tracing::debug!(count = list.data.len(), "Listed remote assistants");
        Ok(list.data)
    }

    #[tracing::instrument(skip(self))]
    async fn get_assistant(&self, id: &str) -> Result<RemoteAssistant, AssistantDirectoryError> {
        self.request(Method::GET, &format!("/assistants/{}", id))
            .await
    }

    async fn test_connection(&self) -> bool {
        match self
            .request::<serde_json::Value>(Method::GET, "/models?limit=1")
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Assistants API connection test failed");
                false
            }
        }
    }
}
