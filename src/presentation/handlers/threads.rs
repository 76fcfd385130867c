use std::convert::Infallible;
use std::time::Duration;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::stream::StreamExt;
use serde::{Deserialize, Serialize};

use crate::application::services::ReplyEvent;
use crate::domain::{ChatThread, MessageId, ThreadId};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::state::AppState;

use super::error::{chat_session_error, invalid_request, not_found};

const KEEP_ALIVE_SECONDS: u64 = 15;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadRequest {
    pub assistant_id: String,
    #[serde(default)]
    pub assistant_name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadResponse {
    pub thread_id: ThreadId,
    pub thread: Option<ChatThread>,
}

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub content: String,
}

#[derive(Serialize)]
struct DeltaPayload<'a> {
    delta: &'a str,
    text: &'a str,
}

pub async fn list_threads_handler(State(state): State<AppState>) -> Json<Vec<ChatThread>> {
    Json(state.chat_sessions.all_threads().await)
}

/// Starts a thread for an assistant. The display name defaults to the
/// catalog name of the assistant.
#[tracing::instrument(skip(state, request), fields(assistant_id = %request.assistant_id))]
pub async fn create_thread_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateThreadRequest>,
) -> Response {
    let assistant_name = match request.assistant_name.filter(|n| !n.trim().is_empty()) {
        Some(name) => name,
        None => match state.assistant_catalog.get(&request.assistant_id).await {
            Some(assistant) => assistant.name,
            None => return not_found(format!("Assistant not found: {}", request.assistant_id)),
        },
    };

    let thread_id = state
        .chat_sessions
        .create_thread(&request.assistant_id, &assistant_name)
        .await;
    let thread = state.chat_sessions.thread(&thread_id).await;

    (
        StatusCode::CREATED,
        Json(CreateThreadResponse { thread_id, thread }),
    )
        .into_response()
}

pub async fn clear_threads_handler(State(state): State<AppState>) -> StatusCode {
    state.chat_sessions.clear_all_threads().await;
    StatusCode::NO_CONTENT
}

pub async fn current_thread_handler(State(state): State<AppState>) -> Json<Option<ChatThread>> {
    Json(state.chat_sessions.current_thread().await)
}

/// Server-sent events carrying the current thread whenever it changes.
pub async fn watch_current_thread_handler(State(state): State<AppState>) -> Response {
    let updates = state
        .chat_sessions
        .watch_current_thread(state.watch_interval)
        .map(|thread| {
            Ok::<_, Infallible>(
                Event::default()
                    .event("thread")
                    .data(serde_json::to_string(&thread).unwrap_or_else(|_| "null".to_string())),
            )
        });

    Sse::new(updates)
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(KEEP_ALIVE_SECONDS)))
        .into_response()
}

pub async fn get_thread_handler(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
) -> Response {
    let Some(thread_id) = ThreadId::parse(&thread_id) else {
        return not_found("Thread not found");
    };
    match state.chat_sessions.thread(&thread_id).await {
        Some(thread) => (StatusCode::OK, Json(thread)).into_response(),
        None => not_found(format!("Thread not found: {}", thread_id)),
    }
}

pub async fn delete_thread_handler(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
) -> Response {
    match ThreadId::parse(&thread_id) {
        Some(id) if state.chat_sessions.delete_thread(&id).await => {
            StatusCode::NO_CONTENT.into_response()
        }
        _ => not_found(format!("Thread not found: {}", thread_id)),
    }
}

pub async fn set_current_thread_handler(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
) -> Response {
    match ThreadId::parse(&thread_id) {
        Some(id) if state.chat_sessions.set_current_thread(&id).await => {
            StatusCode::NO_CONTENT.into_response()
        }
        _ => not_found(format!("Thread not found: {}", thread_id)),
    }
}

#[tracing::instrument(skip(state, request), fields(thread_id = %thread_id))]
pub async fn send_message_handler(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Response {
    let Some(thread_id) = ThreadId::parse(&thread_id) else {
        return not_found("Thread not found");
    };
    send_message(state, Some(thread_id), request).await
}

/// Sends to whichever thread is current.
pub async fn send_current_message_handler(
    State(state): State<AppState>,
    Json(request): Json<MessageRequest>,
) -> Response {
    send_message(state, None, request).await
}

async fn send_message(
    state: AppState,
    thread_id: Option<ThreadId>,
    request: MessageRequest,
) -> Response {
    tracing::debug!(prompt = %sanitize_prompt(&request.content), "Sending message");

    match state
        .chat_sessions
        .send_message(&request.content, thread_id.as_ref())
        .await
    {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Send message failed");
            chat_session_error(&e)
        }
    }
}

/// Streams the reply as `delta` events followed by one of `completed`,
/// `cancelled` or `failed`. Disconnecting cancels the reply.
#[tracing::instrument(skip(state, request), fields(thread_id = %thread_id))]
pub async fn stream_message_handler(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Response {
    let Some(thread_id) = ThreadId::parse(&thread_id) else {
        return not_found("Thread not found");
    };
    tracing::debug!(prompt = %sanitize_prompt(&request.content), "Streaming message");

    let replies = match state
        .chat_sessions
        .stream_message(&request.content, Some(&thread_id))
        .await
    {
        Ok(replies) => replies,
        Err(e) => return chat_session_error(&e),
    };

    let events = replies.map(|event| Ok::<_, Infallible>(sse_event(&event)));

    Sse::new(events)
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(KEEP_ALIVE_SECONDS)))
        .into_response()
}

fn sse_event(event: &ReplyEvent) -> Event {
    let (name, data) = match event {
        ReplyEvent::Delta { delta, text } => (
            "delta",
            serde_json::to_string(&DeltaPayload { delta, text }),
        ),
        ReplyEvent::Completed(message) => ("completed", serde_json::to_string(message)),
        ReplyEvent::Cancelled { partial } => ("cancelled", serde_json::to_string(partial)),
        ReplyEvent::Failed { message } => (
            "failed",
            serde_json::to_string(&serde_json::json!({ "message": message })),
        ),
    };
    Event::default()
        .event(name)
        .data(data.unwrap_or_else(|_| "null".to_string()))
}

#[tracing::instrument(skip(state, request), fields(thread_id = %thread_id, message_id = %message_id))]
pub async fn edit_message_handler(
    State(state): State<AppState>,
    Path((thread_id, message_id)): Path<(String, String)>,
    Json(request): Json<MessageRequest>,
) -> Response {
    let (Some(thread), Some(message)) = (ThreadId::parse(&thread_id), MessageId::parse(&message_id))
    else {
        return invalid_request("Thread and message ids are required");
    };

    match state
        .chat_sessions
        .edit_message(&thread, &message, &request.content)
        .await
    {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Edit message failed");
            chat_session_error(&e)
        }
    }
}
