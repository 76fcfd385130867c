use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use assistant_store::application::ports::ResponseGenerator;
use assistant_store::application::services::{
    AssistantCatalog, ChatSessionManager, ConnectionInfo, PreferencesService, PromptStore,
};
use assistant_store::infrastructure::catalog::{builtin_assistants, fallback_prompts};
use assistant_store::infrastructure::documents::HttpDocumentStore;
use assistant_store::infrastructure::llm::{
    CannedResponder, ChatCompletionsResponder, OpenAiAssistantClient,
};
use assistant_store::infrastructure::observability::{TracingConfig, init_tracing};
use assistant_store::infrastructure::proxy::UpstreamRelay;
use assistant_store::infrastructure::storage::KeyValueStoreFactory;
use assistant_store::presentation::config::{FallbackMode, ResponderKind};
use assistant_store::presentation::{AppState, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (settings, environment) = Settings::load().context("Failed to load settings")?;

    let tracing_config = TracingConfig::from_settings(environment.as_str(), &settings.logging);
    init_tracing(&tracing_config, settings.server.port);

    let http = reqwest::Client::builder()
        .user_agent(concat!("assistant-store/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;
    let api_key = settings.proxy.resolved_api_key();

    let store = KeyValueStoreFactory::create(&settings.storage)
        .await
        .context("Failed to open key-value store")?;

    let chat = &settings.chat;
    let generator: Arc<dyn ResponseGenerator> = match chat.responder {
        ResponderKind::Canned => Arc::new(CannedResponder::new(
            Duration::from_millis(chat.min_delay_ms),
            Duration::from_millis(chat.max_delay_ms),
            Duration::from_millis(chat.chunk_delay_ms),
        )),
        ResponderKind::OpenAi => Arc::new(ChatCompletionsResponder::new(
            http.clone(),
            &chat.completions_base_url,
            api_key.clone(),
            &chat.model,
        )),
    };
    tracing::info!(responder = ?chat.responder, "Response generator selected");

    let chat_sessions = Arc::new(ChatSessionManager::load(Arc::clone(&store), generator).await);

    let documents = &settings.document_store;
    let document_store = HttpDocumentStore::new(
        http.clone(),
        documents.endpoint.as_deref(),
        documents.database.as_deref(),
        documents.collection.as_deref(),
    )
    .with_data_source(documents.data_source.as_deref())
    .with_api_key(documents.api_key.clone());
    let connection = ConnectionInfo {
        endpoint: documents.endpoint.clone(),
        database: documents.database.clone(),
        collection: documents.collection.clone(),
    };
    let fallback = match documents.fallback {
        FallbackMode::Static => fallback_prompts(),
        FallbackMode::Empty => Vec::new(),
    };
    let prompt_store =
        Arc::new(PromptStore::new(Arc::new(document_store), connection).with_fallback(fallback));
    tracing::info!(
        connected = prompt_store.is_connected(),
        "Prompt store initialized"
    );

    let directory = OpenAiAssistantClient::new(
        http.clone(),
        &settings.assistants.directory_base_url,
        api_key.clone(),
    );
    let assistant_catalog = Arc::new(AssistantCatalog::new(
        builtin_assistants(),
        Arc::new(directory),
    ));

    let preferences = Arc::new(PreferencesService::new(Arc::clone(&store), api_key.clone()));
    let relay = Arc::new(UpstreamRelay::new(
        http,
        &settings.proxy.upstream_base_url,
        api_key,
    ));
    if !relay.is_configured() {
        tracing::warn!("No OpenAI API key configured, relay requests will fail");
    }

    let state = AppState {
        chat_sessions,
        prompt_store,
        assistant_catalog,
        preferences,
        relay,
        branding: settings.branding.clone(),
        watch_interval: Duration::from_millis(settings.chat.poll_interval_ms),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
