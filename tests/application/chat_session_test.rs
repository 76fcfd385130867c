use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;

use assistant_store::application::ports::KeyValueStore;
use assistant_store::application::services::{
    ChatSessionError, ChatSessionManager, ReplyEvent, THREADS_KEY,
};
use assistant_store::domain::{ChatThread, MessageRole, ThreadId};
use assistant_store::infrastructure::storage::MemoryStore;

use crate::helpers::{FailingGenerator, FixedGenerator, StallingGenerator, session_with};

#[tokio::test]
async fn given_new_thread_when_created_then_it_is_empty_and_current() {
    let sessions = session_with(Arc::new(FixedGenerator::new("hi"))).await;

    let id = sessions.create_thread("it-support", "IT Support").await;

    let current = sessions.current_thread().await.unwrap();
    assert_eq!(current.id, id);
    assert_eq!(current.assistant_name, "IT Support");
    assert!(current.messages.is_empty());
    assert_eq!(current.created_at, current.updated_at);
}

#[tokio::test]
async fn given_many_creations_when_listing_then_ids_are_unique() {
    let sessions = session_with(Arc::new(FixedGenerator::new("hi"))).await;

    let mut ids = Vec::new();
    for _ in 0..50 {
        ids.push(sessions.create_thread("bms-chatgpt", "OmniChat").await);
    }
    ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    ids.dedup();

    assert_eq!(ids.len(), 50);
    assert_eq!(sessions.all_threads().await.len(), 50);
}

#[tokio::test]
async fn given_current_thread_when_sending_then_user_and_reply_are_appended() {
    let generator = Arc::new(FixedGenerator::new("Have you tried turning it off and on again?"));
    let sessions = session_with(generator.clone()).await;
    let id = sessions.create_thread("it-support", "IT Support").await;

    let reply = sessions.send_message("My laptop froze", None).await.unwrap();

    let thread = sessions.thread(&id).await.unwrap();
    assert_eq!(thread.messages.len(), 2);
    assert_eq!(thread.messages[0].role, MessageRole::User);
    assert_eq!(thread.messages[0].content, "My laptop froze");
    assert_eq!(thread.messages[1], reply);
    assert!(!reply.is_loading);
    assert!(thread.updated_at >= thread.created_at);
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn given_no_current_thread_when_sending_then_no_active_thread() {
    let sessions = session_with(Arc::new(FixedGenerator::new("hi"))).await;

    let result = sessions.send_message("hello", None).await;

    assert!(matches!(result, Err(ChatSessionError::NoActiveThread)));
}

#[tokio::test]
async fn given_blank_text_when_sending_then_rejected_without_calling_backend() {
    let generator = Arc::new(FixedGenerator::new("hi"));
    let sessions = session_with(generator.clone()).await;
    sessions.create_thread("it-support", "IT Support").await;

    let result = sessions.send_message("   ", None).await;

    assert!(matches!(result, Err(ChatSessionError::EmptyMessage)));
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn given_failing_backend_when_sending_then_thread_is_unchanged() {
    let sessions = session_with(Arc::new(FailingGenerator)).await;
    let id = sessions.create_thread("hr-support", "HR Support").await;

    let result = sessions.send_message("When is payday?", Some(&id)).await;

    assert!(matches!(result, Err(ChatSessionError::Generation(_))));
    assert!(sessions.thread(&id).await.unwrap().messages.is_empty());
}

#[tokio::test]
async fn given_explicit_thread_when_sending_then_current_pointer_is_not_moved() {
    let sessions = session_with(Arc::new(FixedGenerator::new("ok"))).await;
    let first = sessions.create_thread("it-support", "IT Support").await;
    let second = sessions.create_thread("hr-support", "HR Support").await;

    sessions.send_message("hello", Some(&first)).await.unwrap();

    assert_eq!(sessions.current_thread().await.unwrap().id, second);
    assert_eq!(sessions.thread(&first).await.unwrap().messages.len(), 2);
}

#[tokio::test]
async fn given_activity_when_listing_then_most_recently_updated_comes_first() {
    let sessions = session_with(Arc::new(FixedGenerator::new("ok"))).await;
    let older = sessions.create_thread("it-support", "IT Support").await;
    let newer = sessions.create_thread("hr-support", "HR Support").await;

    sessions.send_message("bump", Some(&older)).await.unwrap();

    let order: Vec<ThreadId> = sessions.all_threads().await.into_iter().map(|t| t.id).collect();
    assert_eq!(order, vec![older, newer]);
}

#[tokio::test]
async fn given_conversation_when_editing_earlier_message_then_history_is_truncated() {
    let sessions = session_with(Arc::new(FixedGenerator::new("answer"))).await;
    let id = sessions.create_thread("rfp-assistant", "RFP Assistant").await;
    sessions.send_message("one", None).await.unwrap();
    sessions.send_message("two", None).await.unwrap();
    sessions.send_message("three", None).await.unwrap();
    let target = sessions.thread(&id).await.unwrap().messages[2].id.clone();

    sessions.edit_message(&id, &target, "two, again").await.unwrap();

    let thread = sessions.thread(&id).await.unwrap();
    let contents: Vec<&str> = thread.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "answer", "two, again", "answer"]);
}

#[tokio::test]
async fn given_failing_backend_when_editing_then_edit_is_kept_without_reply() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let working =
        ChatSessionManager::load(Arc::clone(&store), Arc::new(FixedGenerator::new("ok"))).await;
    let id = working.create_thread("it-support", "IT Support").await;
    working.send_message("original", None).await.unwrap();

    let failing = ChatSessionManager::load(Arc::clone(&store), Arc::new(FailingGenerator)).await;
    let message_id = failing.thread(&id).await.unwrap().messages[0].id.clone();
    let result = failing.edit_message(&id, &message_id, "rewritten").await;

    assert!(matches!(result, Err(ChatSessionError::Generation(_))));
    let thread = failing.thread(&id).await.unwrap();
    assert_eq!(thread.messages.len(), 1);
    assert_eq!(thread.messages[0].content, "rewritten");
}

#[tokio::test]
async fn given_unknown_message_when_editing_then_message_not_found() {
    let sessions = session_with(Arc::new(FixedGenerator::new("ok"))).await;
    let id = sessions.create_thread("it-support", "IT Support").await;
    let missing = assistant_store::domain::MessageId::new();

    let result = sessions.edit_message(&id, &missing, "text").await;

    assert!(matches!(result, Err(ChatSessionError::MessageNotFound(_))));
}

#[tokio::test]
async fn given_streaming_reply_when_consumed_then_deltas_accumulate_to_completion() {
    let sessions = session_with(Arc::new(FixedGenerator::new("alpha beta gamma"))).await;
    let id = sessions.create_thread("bms-chatgpt", "OmniChat").await;

    let replies = sessions.stream_message("go", Some(&id)).await.unwrap();
    assert_eq!(replies.thread_id(), &id);
    let events: Vec<ReplyEvent> = replies.collect().await;

    let texts: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            ReplyEvent::Delta { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["alpha ", "alpha beta ", "alpha beta gamma"]);

    let last = events.last().unwrap();
    assert!(last.is_terminal());
    let ReplyEvent::Completed(message) = last else {
        panic!("expected completion, got {:?}", last);
    };
    assert_eq!(message.content, "alpha beta gamma");
    assert_eq!(sessions.thread(&id).await.unwrap().messages[1], *message);
}

#[tokio::test]
async fn given_stalled_reply_when_cancelled_then_partial_text_is_kept() {
    let sessions = session_with(Arc::new(StallingGenerator)).await;
    let id = sessions.create_thread("bms-chatgpt", "OmniChat").await;

    let mut replies = sessions.stream_message("write an essay", None).await.unwrap();
    let first = replies.next().await.unwrap();
    assert!(matches!(first, ReplyEvent::Delta { .. }));

    replies.cancel();
    let terminal = replies.next().await.unwrap();

    let ReplyEvent::Cancelled { partial: Some(partial) } = &terminal else {
        panic!("expected a cancelled reply with text, got {:?}", terminal);
    };
    assert_eq!(partial.content, "Partial ");
    assert!(!partial.is_loading);
    let thread = sessions.thread(&id).await.unwrap();
    assert_eq!(thread.messages.len(), 2);
    assert_eq!(thread.messages[1], *partial);
}

#[tokio::test]
async fn given_stalled_reply_when_stream_is_dropped_then_turn_is_cancelled() {
    let sessions = session_with(Arc::new(StallingGenerator)).await;
    let id = sessions.create_thread("bms-chatgpt", "OmniChat").await;

    let mut replies = sessions.stream_message("write an essay", None).await.unwrap();
    assert!(matches!(replies.next().await, Some(ReplyEvent::Delta { .. })));
    drop(replies);

    let thread = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let thread = sessions.thread(&id).await.unwrap();
            if thread.messages.iter().all(|m| !m.is_loading) {
                return thread;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("dropped stream should end the turn");

    assert_eq!(thread.messages.len(), 2);
    assert_eq!(thread.messages[0].content, "write an essay");
    assert_eq!(thread.messages[1].role, MessageRole::Assistant);
    assert_eq!(thread.messages[1].content, "Partial ");
}

#[tokio::test]
async fn given_failing_backend_when_streaming_then_failed_and_turn_rolled_back() {
    let sessions = session_with(Arc::new(FailingGenerator)).await;
    let id = sessions.create_thread("it-support", "IT Support").await;

    let events: Vec<ReplyEvent> = sessions
        .stream_message("help", None)
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], ReplyEvent::Failed { .. }));
    assert!(sessions.thread(&id).await.unwrap().messages.is_empty());
}

#[tokio::test]
async fn given_current_thread_when_deleted_then_pointer_is_cleared() {
    let sessions = session_with(Arc::new(FixedGenerator::new("ok"))).await;
    let id = sessions.create_thread("it-support", "IT Support").await;

    assert!(sessions.delete_thread(&id).await);
    assert!(!sessions.delete_thread(&id).await);
    assert!(sessions.current_thread().await.is_none());
}

#[tokio::test]
async fn given_unknown_thread_when_selected_then_current_is_unchanged() {
    let sessions = session_with(Arc::new(FixedGenerator::new("ok"))).await;
    let id = sessions.create_thread("it-support", "IT Support").await;
    let unknown = ThreadId::new();

    assert!(!sessions.set_current_thread(&unknown).await);
    assert_eq!(sessions.current_thread().await.unwrap().id, id);
}

#[tokio::test]
async fn given_threads_when_cleared_then_storage_key_is_removed() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let sessions =
        ChatSessionManager::load(Arc::clone(&store), Arc::new(FixedGenerator::new("ok"))).await;
    sessions.create_thread("it-support", "IT Support").await;
    assert!(store.get(THREADS_KEY).await.unwrap().is_some());

    sessions.clear_all_threads().await;

    assert!(sessions.all_threads().await.is_empty());
    assert!(store.get(THREADS_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn given_persisted_threads_when_reloaded_then_threads_are_restored() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let first =
        ChatSessionManager::load(Arc::clone(&store), Arc::new(FixedGenerator::new("ok"))).await;
    let id = first.create_thread("hr-support", "HR Support").await;
    first.send_message("hello", None).await.unwrap();

    let reloaded =
        ChatSessionManager::load(Arc::clone(&store), Arc::new(FixedGenerator::new("ok"))).await;

    let thread = reloaded.thread(&id).await.unwrap();
    assert_eq!(thread.messages.len(), 2);
    assert!(reloaded.current_thread().await.is_none());

    let raw = store.get(THREADS_KEY).await.unwrap().unwrap();
    let stored: Vec<ChatThread> = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn given_corrupt_storage_when_loading_then_starts_empty() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    store.set(THREADS_KEY, "{not json").await.unwrap();

    let sessions = ChatSessionManager::load(store, Arc::new(FixedGenerator::new("ok"))).await;

    assert!(sessions.all_threads().await.is_empty());
}

#[tokio::test]
async fn given_watcher_when_thread_changes_then_new_snapshot_is_emitted() {
    let sessions = session_with(Arc::new(FixedGenerator::new("ok"))).await;
    let mut updates = sessions.watch_current_thread(Duration::from_millis(5));

    let initial = updates.next().await.unwrap();
    assert!(initial.is_none());

    let id = sessions.create_thread("it-support", "IT Support").await;
    let created = tokio::time::timeout(Duration::from_secs(2), updates.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.unwrap().id, id);

    sessions.send_message("ping", None).await.unwrap();
    let updated = tokio::time::timeout(Duration::from_secs(2), updates.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, id);
    assert!(!updated.messages.is_empty());
}
