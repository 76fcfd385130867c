use std::sync::Arc;

use assistant_store::application::ports::{KeyValueStore, StorageError};
use assistant_store::application::services::ChatSessionManager;
use assistant_store::infrastructure::storage::{JsonFileStore, KeyValueStoreFactory};
use assistant_store::presentation::config::StorageSettings;
use tempfile::TempDir;

use crate::helpers::FixedGenerator;

#[tokio::test]
async fn given_written_keys_when_reopened_then_values_survive() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state").join("store.json");

    let store = JsonFileStore::open(&path).await.unwrap();
    store.set("userProfile", r#"{"name":"Ada"}"#).await.unwrap();
    store.set("openai_api_key", "sk-1").await.unwrap();
    store.remove("openai_api_key").await.unwrap();
    drop(store);

    let reopened = JsonFileStore::open(&path).await.unwrap();
    assert_eq!(
        reopened.get("userProfile").await.unwrap().as_deref(),
        Some(r#"{"name":"Ada"}"#)
    );
    assert_eq!(reopened.get("openai_api_key").await.unwrap(), None);
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn given_failing_write_when_setting_then_previous_value_is_kept() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    let store = JsonFileStore::open(&path).await.unwrap();
    store.set("openai_api_key", "sk-1").await.unwrap();
    tokio::fs::create_dir(path.with_extension("json.tmp")).await.unwrap();

    let changed = store.set("openai_api_key", "sk-2").await;
    let added = store.set("userProfile", "{}").await;
    let removed = store.remove("openai_api_key").await;

    assert!(matches!(changed, Err(StorageError::WriteFailed(_))));
    assert!(added.is_err());
    assert!(removed.is_err());
    assert_eq!(store.get("openai_api_key").await.unwrap().as_deref(), Some("sk-1"));
    assert_eq!(store.get("userProfile").await.unwrap(), None);
}

#[tokio::test]
async fn given_corrupt_file_when_opening_then_corrupt_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    tokio::fs::write(&path, "[1, 2").await.unwrap();

    let result = JsonFileStore::open(&path).await;

    assert!(matches!(result, Err(StorageError::Corrupt(_))));
}

#[tokio::test]
async fn given_empty_file_when_opening_then_store_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    tokio::fs::write(&path, "").await.unwrap();

    let store = JsonFileStore::open(&path).await.unwrap();

    assert_eq!(store.get("chat_threads").await.unwrap(), None);
    assert_eq!(store.path(), path.as_path());
}

#[tokio::test]
async fn given_chat_threads_when_server_restarts_then_threads_are_restored_from_disk() {
    let dir = TempDir::new().unwrap();
    let settings = StorageSettings {
        path: Some(dir.path().join("store.json").display().to_string()),
    };

    let store = KeyValueStoreFactory::create(&settings).await.unwrap();
    let sessions = ChatSessionManager::load(store, Arc::new(FixedGenerator::new("Sure."))).await;
    let id = sessions.create_thread("hr-support", "HR Support").await;
    sessions.send_message("Can I carry over vacation days?", None).await.unwrap();
    drop(sessions);

    let store = KeyValueStoreFactory::create(&settings).await.unwrap();
    let restored = ChatSessionManager::load(store, Arc::new(FixedGenerator::new("Sure."))).await;

    let thread = restored.thread(&id).await.unwrap();
    assert_eq!(thread.assistant_name, "HR Support");
    assert_eq!(thread.messages[1].content, "Sure.");
}

#[tokio::test]
async fn given_no_path_when_creating_store_then_memory_store_is_used() {
    let store = KeyValueStoreFactory::create(&StorageSettings::default())
        .await
        .unwrap();

    store.set("k", "v").await.unwrap();

    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
}
