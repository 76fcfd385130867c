use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::infrastructure::proxy::RelayError;
use crate::presentation::state::AppState;

/// `ANY /api/openai/{*path}`: upstream status and JSON body are returned as-is.
#[tracing::instrument(skip(state, headers, body), fields(method = %method))]
pub async fn openai_proxy_handler(
    State(state): State<AppState>,
    method: Method,
    Path(path): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match state
        .relay
        .forward(method, &path, uri.query(), &headers, body)
        .await
    {
        Ok(relayed) => (relayed.status, Json(relayed.body)).into_response(),
        Err(RelayError::NotConfigured) => {
            tracing::error!("Relay called without a server API key");
            relay_failure(RelayError::NotConfigured.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Proxy error");
            relay_failure("Internal proxy server error".to_string())
        }
    }
}

fn relay_failure(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": { "message": message } })),
    )
        .into_response()
}
