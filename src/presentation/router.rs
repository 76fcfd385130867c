use axum::Router;
use axum::middleware;
use axum::routing::{any, get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    accept_guidelines_handler, api_key_status_handler, branding_handler, clear_api_key_handler,
    clear_threads_handler, create_prompt_handler, create_thread_handler, current_thread_handler,
    delete_prompt_handler, delete_thread_handler, edit_message_handler, get_assistant_handler,
    get_profile_handler, get_thread_handler, health_handler, import_assistants_handler,
    list_assistants_handler, list_prompts_handler, list_threads_handler, openai_proxy_handler,
    prompt_connection_handler, save_profile_handler, search_prompts_handler,
    send_current_message_handler, send_message_handler, set_api_key_handler,
    set_current_thread_handler, stream_message_handler, toggle_favorite_handler,
    update_prompt_handler, watch_current_thread_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/openai/{*path}", any(openai_proxy_handler))
        .route("/api/branding", get(branding_handler))
        .merge(assistant_routes())
        .merge(prompt_routes())
        .merge(thread_routes())
        .merge(preference_routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

fn assistant_routes() -> Router<AppState> {
    Router::new()
        .route("/api/assistants", get(list_assistants_handler))
        .route("/api/assistants/import", post(import_assistants_handler))
        .route("/api/assistants/{id}", get(get_assistant_handler))
        .route("/api/assistants/{id}/favorite", post(toggle_favorite_handler))
}

fn prompt_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/prompts",
            get(list_prompts_handler).post(create_prompt_handler),
        )
        .route("/api/prompts/search", get(search_prompts_handler))
        .route("/api/prompts/connection", get(prompt_connection_handler))
        .route(
            "/api/prompts/{id}",
            put(update_prompt_handler).delete(delete_prompt_handler),
        )
}

fn thread_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/threads",
            get(list_threads_handler)
                .post(create_thread_handler)
                .delete(clear_threads_handler),
        )
        .route("/api/threads/current", get(current_thread_handler))
        .route(
            "/api/threads/current/watch",
            get(watch_current_thread_handler),
        )
        .route(
            "/api/threads/current/messages",
            post(send_current_message_handler),
        )
        .route(
            "/api/threads/{id}",
            get(get_thread_handler).delete(delete_thread_handler),
        )
        .route("/api/threads/{id}/current", put(set_current_thread_handler))
        .route("/api/threads/{id}/messages", post(send_message_handler))
        .route(
            "/api/threads/{id}/messages/stream",
            post(stream_message_handler),
        )
        .route(
            "/api/threads/{id}/messages/{message_id}",
            put(edit_message_handler),
        )
}

fn preference_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/profile",
            get(get_profile_handler).put(save_profile_handler),
        )
        .route("/api/profile/guidelines", post(accept_guidelines_handler))
        .route(
            "/api/credentials/api-key",
            get(api_key_status_handler)
                .put(set_api_key_handler)
                .delete(clear_api_key_handler),
        )
}
