use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::{ChatSessionError, PreferencesError};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

#[derive(Serialize)]
pub struct ApiError {
    pub message: String,
    pub r#type: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>, kind: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: ApiError {
                message: message.into(),
                r#type: kind.to_string(),
            },
        }),
    )
        .into_response()
}

pub fn not_found(message: impl Into<String>) -> Response {
    error_response(StatusCode::NOT_FOUND, message, "not_found_error")
}

pub fn invalid_request(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, message, "invalid_request_error")
}

pub fn chat_session_error(error: &ChatSessionError) -> Response {
    let (status, kind) = match error {
        ChatSessionError::NoActiveThread
        | ChatSessionError::NotEditable(_)
        | ChatSessionError::EmptyMessage => (StatusCode::BAD_REQUEST, "invalid_request_error"),
        ChatSessionError::ThreadNotFound(_) | ChatSessionError::MessageNotFound(_) => {
            (StatusCode::NOT_FOUND, "not_found_error")
        }
        ChatSessionError::Generation(_) => (StatusCode::BAD_GATEWAY, "generation_error"),
    };
    error_response(status, error.to_string(), kind)
}

pub fn preferences_error(error: &PreferencesError) -> Response {
    let (status, kind) = match error {
        PreferencesError::InvalidProfile
        | PreferencesError::NoProfile
        | PreferencesError::EmptyApiKey => (StatusCode::BAD_REQUEST, "invalid_request_error"),
        PreferencesError::Encode(_) | PreferencesError::Storage(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "storage_error")
        }
    };
    error_response(status, error.to_string(), kind)
}
