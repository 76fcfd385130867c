use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, header};
use reqwest::Client;
use serde_json::Value;

const ASSISTANTS_BETA: &str = "assistants=v2";

/// Headers that describe one connection hop and must not be forwarded.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("OpenAI API key not configured on server")]
    NotConfigured,
    #[error("upstream request failed: {0}")]
    RequestFailed(String),
    #[error("upstream returned a non-JSON body: {0}")]
    InvalidBody(String),
}

#[derive(Debug)]
pub struct RelayedResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Forwards requests to the upstream AI API with the server's credential.
pub struct UpstreamRelay {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl UpstreamRelay {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn upstream_url(&self, path: &str, query: Option<&str>) -> String {
        let path = path.trim_start_matches('/');
        match query.filter(|q| !q.is_empty()) {
            Some(query) => format!("{}/{}?{}", self.base_url, path, query),
            None => format!("{}/{}", self.base_url, path),
        }
    }

    #[tracing::instrument(skip(self, headers, body), fields(body_bytes = body.len()))]
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<RelayedResponse, RelayError> {
        let api_key = self.api_key.as_deref().ok_or(RelayError::NotConfigured)?;
        let url = self.upstream_url(path, query);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .headers(forwardable_headers(headers, api_key));
        if method != Method::GET && method != Method::HEAD {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RelayError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::RequestFailed(e.to_string()))?;
        let body: Value =
            serde_json::from_slice(&bytes).map_err(|e| RelayError::InvalidBody(e.to_string()))?;

        tracing::debug!(status = status.as_u16(), "Relayed upstream response");
        Ok(RelayedResponse { status, body })
    }
}

/// Client headers the relay replaces or must not pass on. Bodies are parsed
/// as JSON, so the upstream is never asked for a compressed encoding.
const CLIENT_ONLY: [&str; 5] = [
    "host",
    "content-length",
    "authorization",
    "accept-encoding",
    "cookie",
];

/// Client headers minus hop-by-hop and client-only ones, plus the server
/// credential and fixed API headers.
fn forwardable_headers(incoming: &HeaderMap, api_key: &str) -> HeaderMap {
    let mut headers: HeaderMap = incoming
        .iter()
        .filter(|(name, _)| {
            let name = name.as_str();
            !HOP_BY_HOP.contains(&name) && !CLIENT_ONLY.contains(&name)
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", api_key)) {
        headers.insert(header::AUTHORIZATION, value);
    }
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        HeaderName::from_static("openai-beta"),
        HeaderValue::from_static(ASSISTANTS_BETA),
    );
    headers
}
