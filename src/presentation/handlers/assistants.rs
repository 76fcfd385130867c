use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::ports::AssistantDirectoryError;
use crate::domain::{Assistant, AssistantSort};
use crate::presentation::state::AppState;

use super::error::{error_response, not_found};

#[derive(Debug, Default, Deserialize)]
pub struct AssistantsQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub sort: AssistantSort,
}

#[derive(Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub assistants: Vec<Assistant>,
}

pub async fn list_assistants_handler(
    State(state): State<AppState>,
    Query(query): Query<AssistantsQuery>,
) -> Json<Vec<Assistant>> {
    Json(
        state
            .assistant_catalog
            .list(query.search.as_deref(), query.sort)
            .await,
    )
}

pub async fn get_assistant_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.assistant_catalog.get(&id).await {
        Some(assistant) => (StatusCode::OK, Json(assistant)).into_response(),
        None => not_found(format!("Assistant not found: {}", id)),
    }
}

pub async fn toggle_favorite_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.assistant_catalog.toggle_favorite(&id).await {
        Some(assistant) => (StatusCode::OK, Json(assistant)).into_response(),
        None => not_found(format!("Assistant not found: {}", id)),
    }
}

#[tracing::instrument(skip(state))]
pub async fn import_assistants_handler(State(state): State<AppState>) -> Response {
    match state.assistant_catalog.import_remote().await {
        Ok(assistants) => (
            StatusCode::OK,
            Json(ImportResponse {
                imported: assistants.len(),
                assistants,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Assistant import failed");
            let status = match e {
                AssistantDirectoryError::NotConfigured => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            };
            error_response(status, e.to_string(), "upstream_error")
        }
    }
}
