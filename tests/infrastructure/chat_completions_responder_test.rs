use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, body::Body};
use futures::StreamExt;
use serde_json::{Value, json};

use assistant_store::application::ports::{GenerationError, ReplyRequest, ResponseGenerator};
use assistant_store::domain::{ChatMessage, MessageRole};
use assistant_store::infrastructure::llm::ChatCompletionsResponder;

use crate::helpers::spawn_server;

const SSE_BODY: &str = "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n\
data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n\
data: not json\n\n\
data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n\
data: [DONE]\n\n";

async fn completions(headers: HeaderMap, Json(body): Json<Value>) -> axum::response::Response {
    use axum::response::IntoResponse;

    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer sk-test") {
        return StatusCode::TOO_MANY_REQUESTS.into_response();
    }
    if body["stream"] == json!(true) {
        return ([("content-type", "text/event-stream")], Body::from(SSE_BODY)).into_response();
    }
    let messages = body["messages"].as_array().cloned().unwrap_or_default();
    let summary = messages
        .iter()
        .map(|m| {
            format!(
                "{}:{}",
                m["role"].as_str().unwrap_or(""),
                m["content"].as_str().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("|");
    Json(json!({
        "choices": [{ "message": { "role": "assistant", "content": summary } }]
    }))
    .into_response()
}

fn request() -> ReplyRequest {
    ReplyRequest {
        assistant_id: "it-support".to_string(),
        assistant_name: "IT Support".to_string(),
        message: "Still broken".to_string(),
        history: vec![
            ChatMessage::new(MessageRole::User, "Printer jammed".to_string()),
            ChatMessage::new(MessageRole::Assistant, "Open tray 2".to_string()),
        ],
    }
}

async fn responder(api_key: &str) -> ChatCompletionsResponder {
    let addr = spawn_server(Router::new().route("/v1/chat/completions", post(completions))).await;
    ChatCompletionsResponder::new(
        reqwest::Client::new(),
        &format!("http://{}/v1/", addr),
        Some(api_key.to_string()),
        "gpt-4o-mini",
    )
}

#[tokio::test]
async fn given_history_when_generating_then_system_history_and_message_are_sent_in_order() {
    let responder = responder("sk-test").await;

    let reply = responder.generate(&request()).await.unwrap();

    let parts: Vec<&str> = reply.split('|').collect();
    assert_eq!(parts.len(), 4);
    assert!(parts[0].starts_with("system:You are IT Support"));
    assert_eq!(parts[1], "user:Printer jammed");
    assert_eq!(parts[2], "assistant:Open tray 2");
    assert_eq!(parts[3], "user:Still broken");
}

#[tokio::test]
async fn given_event_stream_when_streaming_then_content_deltas_are_yielded() {
    let responder = responder("sk-test").await;

    let tokens: Vec<String> = responder
        .generate_stream(&request())
        .await
        .unwrap()
        .map(|t| t.unwrap())
        .collect()
        .await;

    assert_eq!(tokens, vec!["Hel", "lo"]);
}

#[tokio::test]
async fn given_rate_limit_when_generating_then_rate_limited_error() {
    let responder = responder("sk-other").await;

    let result = responder.generate(&request()).await;

    assert!(matches!(result, Err(GenerationError::RateLimited)));
}
