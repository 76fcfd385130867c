use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::domain::UserProfile;
use crate::presentation::state::AppState;

use super::error::preferences_error;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRequest {
    pub api_key: String,
}

/// The saved profile, or `null` before one exists.
pub async fn get_profile_handler(State(state): State<AppState>) -> Response {
    match state.preferences.profile().await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => preferences_error(&e),
    }
}

pub async fn save_profile_handler(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Response {
    match state.preferences.save_profile(profile).await {
        Ok(saved) => (StatusCode::OK, Json(saved)).into_response(),
        Err(e) => preferences_error(&e),
    }
}

pub async fn accept_guidelines_handler(State(state): State<AppState>) -> Response {
    match state.preferences.accept_guidelines().await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => preferences_error(&e),
    }
}

pub async fn set_api_key_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiKeyRequest>,
) -> Response {
    match state.preferences.set_api_key(&request.api_key).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => preferences_error(&e),
    }
}

pub async fn clear_api_key_handler(State(state): State<AppState>) -> Response {
    match state.preferences.clear_api_key().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => preferences_error(&e),
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ApiKeyStatus {
    pub configured: bool,
}

/// Whether a key is available, from the environment or storage. Never the key itself.
pub async fn api_key_status_handler(State(state): State<AppState>) -> Json<ApiKeyStatus> {
    Json(ApiKeyStatus {
        configured: state.preferences.has_api_key().await,
    })
}
