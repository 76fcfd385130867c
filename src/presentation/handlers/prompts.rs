use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::application::services::ConnectionSummary;
use crate::domain::{Prompt, PromptDraft, PromptFilter, PromptUpdate};
use crate::presentation::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PromptsQuery {
    pub search: Option<String>,
    pub assistant: Option<String>,
    pub task: Option<String>,
    pub functional_area: Option<String>,
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct WriteResponse {
    pub success: bool,
}

#[tracing::instrument(skip(state))]
pub async fn list_prompts_handler(
    State(state): State<AppState>,
    Query(query): Query<PromptsQuery>,
) -> Json<Vec<Prompt>> {
    let prompts = match query.assistant.as_deref().filter(|a| !a.is_empty()) {
        Some(assistant) if !query.refresh => {
            state.prompt_store.get_prompts_by_assistant(assistant).await
        }
        _ => state.prompt_store.get_prompts(query.refresh).await,
    };

    let filter = PromptFilter {
        search: query.search,
        assistant: query.assistant,
        task: query.task,
        functional_area: query.functional_area,
    };
    Json(filter.apply(prompts))
}

pub async fn search_prompts_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Prompt>> {
    Json(state.prompt_store.search_prompts(&query.q).await)
}

pub async fn prompt_connection_handler(State(state): State<AppState>) -> Json<ConnectionSummary> {
    Json(state.prompt_store.connection_info())
}

/// Prompts without an owner are attributed to the saved profile.
#[tracing::instrument(skip(state, draft))]
pub async fn create_prompt_handler(
    State(state): State<AppState>,
    Json(mut draft): Json<PromptDraft>,
) -> Json<WriteResponse> {
    if draft.owner.as_deref().is_none_or(|o| o.trim().is_empty()) {
        draft.owner = Some(state.preferences.owner_name().await);
    }
    Json(WriteResponse {
        success: state.prompt_store.add_prompt(draft).await,
    })
}

#[tracing::instrument(skip(state, update))]
pub async fn update_prompt_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<PromptUpdate>,
) -> Json<WriteResponse> {
    Json(WriteResponse {
        success: state.prompt_store.update_prompt(&id, update).await,
    })
}

#[tracing::instrument(skip(state))]
pub async fn delete_prompt_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<WriteResponse> {
    Json(WriteResponse {
        success: state.prompt_store.delete_prompt(&id).await,
    })
}
