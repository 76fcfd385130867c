use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::{Mutex, mpsc, watch};

use super::reply_stream::{CancelHandle, ReplyEvent, ReplyStream};
use crate::application::ports::{GenerationError, KeyValueStore, ReplyRequest, ResponseGenerator};
use crate::domain::{ChatMessage, ChatThread, MessageId, MessageRole, ThreadId};

/// Storage key holding every thread as one JSON array.
pub const THREADS_KEY: &str = "chat_threads";

const REPLY_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum ChatSessionError {
    #[error("No active chat thread")]
    NoActiveThread,
    #[error("Thread not found: {0}")]
    ThreadNotFound(ThreadId),
    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),
    #[error("Only user messages can be edited")]
    NotEditable(MessageId),
    #[error("Message content must not be empty")]
    EmptyMessage,
    #[error("Failed to generate response: {0}")]
    Generation(#[from] GenerationError),
}

#[derive(Default)]
struct SessionState {
    threads: HashMap<ThreadId, ChatThread>,
    current: Option<ThreadId>,
    last_stamp: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Wall-clock time, nudged forward so that successive stamps never repeat.
    fn next_stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + TimeDelta::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    fn target(&self, thread_id: Option<&ThreadId>) -> Result<ThreadId, ChatSessionError> {
        match thread_id {
            Some(id) if self.threads.contains_key(id) => Ok(id.clone()),
            Some(id) => Err(ChatSessionError::ThreadNotFound(id.clone())),
            None => self
                .current
                .clone()
                .filter(|id| self.threads.contains_key(id))
                .ok_or(ChatSessionError::NoActiveThread),
        }
    }

    fn sorted_threads(&self) -> Vec<ChatThread> {
        let mut threads: Vec<ChatThread> = self.threads.values().cloned().collect();
        threads.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        threads
    }
}

/// A turn whose placeholder is in the thread but whose reply is not.
struct PendingTurn {
    thread_id: ThreadId,
    /// Set for fresh turns, so a failure can take the user message back out.
    user_message_id: Option<MessageId>,
    placeholder: ChatMessage,
    request: ReplyRequest,
}

/// Owns every chat thread and the current-thread pointer. All changes are
/// written through to the key-value store under [`THREADS_KEY`].
pub struct ChatSessionManager {
    store: Arc<dyn KeyValueStore>,
    generator: Arc<dyn ResponseGenerator>,
    state: Mutex<SessionState>,
}

impl ChatSessionManager {
    /// Restores persisted threads. Unreadable data is logged and skipped.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        generator: Arc<dyn ResponseGenerator>,
    ) -> Self {
        let threads = match store.get(THREADS_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<ChatThread>>(&raw) {
                Ok(threads) => threads,
                Err(e) => {
                    tracing::warn!(error = %e, "Stored chat threads are unreadable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load chat threads, starting empty");
                Vec::new()
            }
        };

        let last_stamp = threads.iter().map(|t| t.updated_at).max();
        let threads: HashMap<ThreadId, ChatThread> =
            threads.into_iter().map(|t| (t.id.clone(), t)).collect();
        tracing::info!(count = threads.len(), "Chat threads loaded");

        Self {
            store,
            generator,
            state: Mutex::new(SessionState {
                threads,
                current: None,
                last_stamp,
            }),
        }
    }

    /// Starts an empty thread and makes it current.
    pub async fn create_thread(&self, assistant_id: &str, assistant_name: &str) -> ThreadId {
        let mut state = self.state.lock().await;
        let stamp = state.next_stamp();

        let mut thread = ChatThread::new(assistant_id.to_string(), assistant_name.to_string());
        thread.created_at = stamp;
        thread.updated_at = stamp;
        let id = thread.id.clone();

        state.threads.insert(id.clone(), thread);
        state.current = Some(id.clone());
        self.persist(&state).await;

        tracing::info!(thread_id = %id, assistant_id, "Chat thread created");
        id
    }

    pub async fn current_thread(&self) -> Option<ChatThread> {
        let state = self.state.lock().await;
        state
            .current
            .as_ref()
            .and_then(|id| state.threads.get(id))
            .cloned()
    }

    pub async fn thread(&self, id: &ThreadId) -> Option<ChatThread> {
        self.state.lock().await.threads.get(id).cloned()
    }

    /// Every thread, most recently updated first.
    pub async fn all_threads(&self) -> Vec<ChatThread> {
        self.state.lock().await.sorted_threads()
    }

    /// Points the session at an existing thread. Unknown ids leave it unchanged.
    pub async fn set_current_thread(&self, id: &ThreadId) -> bool {
        let mut state = self.state.lock().await;
        if !state.threads.contains_key(id) {
            return false;
        }
        state.current = Some(id.clone());
        true
    }

    /// Appends `text` as a user message and waits for the assistant reply.
    ///
    /// When generation fails the whole turn is taken back out, so the thread
    /// ends up exactly as it was before the call.
    pub async fn send_message(
        &self,
        text: &str,
        thread_id: Option<&ThreadId>,
    ) -> Result<ChatMessage, ChatSessionError> {
        let turn = self.begin_turn(text, thread_id).await?;
        let result = self.generator.generate(&turn.request).await;
        self.complete_turn(turn, result).await
    }

    /// Rewrites a user message, drops everything after it, and asks again.
    pub async fn edit_message(
        &self,
        thread_id: &ThreadId,
        message_id: &MessageId,
        content: &str,
    ) -> Result<ChatMessage, ChatSessionError> {
        let turn = self.begin_edit(thread_id, message_id, content).await?;
        let result = self.generator.generate(&turn.request).await;
        self.complete_turn(turn, result).await
    }

    /// Like [`send_message`](Self::send_message), but yields the reply as it is
    /// produced. The returned stream can be cancelled; whatever text arrived
    /// by then is kept as the assistant message.
    pub async fn stream_message(
        self: &Arc<Self>,
        text: &str,
        thread_id: Option<&ThreadId>,
    ) -> Result<ReplyStream, ChatSessionError> {
        let turn = self.begin_turn(text, thread_id).await?;
        let target = turn.thread_id.clone();

        let (sender, receiver) = mpsc::channel(REPLY_CHANNEL_CAPACITY);
        let (cancel, cancelled) = CancelHandle::new();

        let manager = Arc::clone(self);
        tokio::spawn(async move {
            manager.drive_reply(turn, sender, cancelled).await;
        });

        Ok(ReplyStream::new(target, receiver, cancel))
    }

    /// Removes a thread. Clears the current pointer if it pointed there.
    pub async fn delete_thread(&self, id: &ThreadId) -> bool {
        let mut state = self.state.lock().await;
        if state.threads.remove(id).is_none() {
            return false;
        }
        if state.current.as_ref() == Some(id) {
            state.current = None;
        }
        self.persist(&state).await;

        tracing::info!(thread_id = %id, "Chat thread deleted");
        true
    }

    pub async fn clear_all_threads(&self) {
        let mut state = self.state.lock().await;
        state.threads.clear();
        state.current = None;
        if let Err(e) = self.store.remove(THREADS_KEY).await {
            tracing::warn!(error = %e, "Failed to clear persisted chat threads");
        }
        tracing::info!("All chat threads cleared");
    }

    /// Emits the current thread once, then again every time it changes.
    /// Changes are picked up on a fixed polling interval.
    pub fn watch_current_thread(
        self: &Arc<Self>,
        interval: Duration,
    ) -> BoxStream<'static, Option<ChatThread>> {
        let manager = Arc::clone(self);
        async_stream::stream! {
            let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut last: Option<Option<ChatThread>> = None;

            loop {
                ticker.tick().await;
                let current = manager.current_thread().await;
                if last.as_ref() != Some(&current) {
                    last = Some(current.clone());
                    yield current;
                }
            }
        }
        .boxed()
    }

    async fn begin_turn(
        &self,
        text: &str,
        thread_id: Option<&ThreadId>,
    ) -> Result<PendingTurn, ChatSessionError> {
        if text.trim().is_empty() {
            return Err(ChatSessionError::EmptyMessage);
        }

        let mut state = self.state.lock().await;
        let target = state.target(thread_id)?;
        let stamp = state.next_stamp();

        let turn = {
            let thread = state
                .threads
                .get_mut(&target)
                .ok_or_else(|| ChatSessionError::ThreadNotFound(target.clone()))?;

            let history = thread.history();
            let user_message = ChatMessage {
                timestamp: stamp,
                ..ChatMessage::new(MessageRole::User, text.to_string())
            };
            let placeholder = ChatMessage {
                timestamp: stamp,
                ..ChatMessage::placeholder()
            };

            thread.messages.push(user_message.clone());
            thread.messages.push(placeholder.clone());
            thread.updated_at = stamp;

            PendingTurn {
                thread_id: target.clone(),
                user_message_id: Some(user_message.id),
                placeholder,
                request: ReplyRequest {
                    assistant_id: thread.assistant_id.clone(),
                    assistant_name: thread.assistant_name.clone(),
                    message: text.to_string(),
                    history,
                },
            }
        };
        self.persist(&state).await;

        tracing::debug!(thread_id = %target, chars = text.len(), "Turn started");
        Ok(turn)
    }

    async fn begin_edit(
        &self,
        thread_id: &ThreadId,
        message_id: &MessageId,
        content: &str,
    ) -> Result<PendingTurn, ChatSessionError> {
        if content.trim().is_empty() {
            return Err(ChatSessionError::EmptyMessage);
        }

        let mut state = self.state.lock().await;
        let stamp = state.next_stamp();

        let turn = {
            let thread = state
                .threads
                .get_mut(thread_id)
                .ok_or_else(|| ChatSessionError::ThreadNotFound(thread_id.clone()))?;
            let index = thread
                .position_of(message_id)
                .ok_or_else(|| ChatSessionError::MessageNotFound(message_id.clone()))?;
            if thread.messages[index].role != MessageRole::User {
                return Err(ChatSessionError::NotEditable(message_id.clone()));
            }

            thread.messages[index].content = content.to_string();
            thread.truncate_after(index);
            let history: Vec<ChatMessage> = thread.messages[..index]
                .iter()
                .filter(|m| !m.is_loading)
                .cloned()
                .collect();

            let placeholder = ChatMessage {
                timestamp: stamp,
                ..ChatMessage::placeholder()
            };
            thread.messages.push(placeholder.clone());
            thread.updated_at = stamp;

            PendingTurn {
                thread_id: thread_id.clone(),
                user_message_id: None,
                placeholder,
                request: ReplyRequest {
                    assistant_id: thread.assistant_id.clone(),
                    assistant_name: thread.assistant_name.clone(),
                    message: content.to_string(),
                    history,
                },
            }
        };
        self.persist(&state).await;

        tracing::debug!(thread_id = %thread_id, message_id = %message_id, "Message edited");
        Ok(turn)
    }

    /// Swaps the placeholder for the reply, or rolls the turn back on failure.
    async fn complete_turn(
        &self,
        turn: PendingTurn,
        result: Result<String, GenerationError>,
    ) -> Result<ChatMessage, ChatSessionError> {
        let mut state = self.state.lock().await;
        let stamp = state.next_stamp();

        match result {
            Ok(content) => {
                let reply = turn.placeholder.materialize(content);
                let stored = match state.threads.get_mut(&turn.thread_id) {
                    Some(thread) => {
                        let replaced = thread.replace_message(&turn.placeholder.id, reply.clone());
                        if replaced {
                            thread.updated_at = stamp;
                        }
                        replaced
                    }
                    None => false,
                };
                if !stored {
                    tracing::warn!(thread_id = %turn.thread_id, "Reply arrived for a thread that no longer holds it");
                    return Ok(reply);
                }
                self.persist(&state).await;
                tracing::debug!(thread_id = %turn.thread_id, "Turn completed");
                Ok(reply)
            }
            Err(e) => {
                if let Some(thread) = state.threads.get_mut(&turn.thread_id) {
                    thread.remove_message(&turn.placeholder.id);
                    if let Some(user_message_id) = &turn.user_message_id {
                        thread.remove_message(user_message_id);
                    }
                }
                self.persist(&state).await;
                tracing::error!(thread_id = %turn.thread_id, error = %e, "Failed to generate response");
                Err(ChatSessionError::Generation(e))
            }
        }
    }

    /// Keeps the partial reply, or drops the placeholder if nothing arrived.
    async fn cancel_turn(&self, turn: PendingTurn, partial: String) -> Option<ChatMessage> {
        let mut state = self.state.lock().await;
        let stamp = state.next_stamp();

        let kept = {
            let thread = state.threads.get_mut(&turn.thread_id)?;
            let kept = if partial.is_empty() {
                thread.remove_message(&turn.placeholder.id);
                None
            } else {
                let message = turn.placeholder.materialize(partial);
                thread
                    .replace_message(&turn.placeholder.id, message.clone())
                    .then_some(message)
            };
            thread.updated_at = stamp;
            kept
        };
        self.persist(&state).await;

        tracing::info!(thread_id = %turn.thread_id, kept = kept.is_some(), "Reply cancelled");
        kept
    }

    async fn drive_reply(
        &self,
        turn: PendingTurn,
        sender: mpsc::Sender<ReplyEvent>,
        mut cancelled: watch::Receiver<bool>,
    ) {
        let mut tokens = match self.generator.generate_stream(&turn.request).await {
            Ok(tokens) => tokens,
            Err(e) => {
                let message = e.to_string();
                let _ = self.complete_turn(turn, Err(e)).await;
                let _ = sender.send(ReplyEvent::Failed { message }).await;
                return;
            }
        };

        let mut text = String::new();
        let mut failure = None;
        let mut stopped = false;

        loop {
            tokio::select! {
                biased;
                _ = async { let _ = cancelled.wait_for(|cancel| *cancel).await; } => {
                    stopped = true;
                    break;
                }
                next = tokens.next() => match next {
                    Some(Ok(delta)) => {
                        text.push_str(&delta);
                        let event = ReplyEvent::Delta { delta, text: text.clone() };
                        if sender.send(event).await.is_err() {
                            stopped = true;
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        failure = Some(e);
                        break;
                    }
                    None => break,
                },
            }
        }

        let event = if stopped {
            ReplyEvent::Cancelled {
                partial: self.cancel_turn(turn, text).await,
            }
        } else if let Some(e) = failure {
            let message = e.to_string();
            let _ = self.complete_turn(turn, Err(e)).await;
            ReplyEvent::Failed { message }
        } else {
            match self.complete_turn(turn, Ok(text)).await {
                Ok(reply) => ReplyEvent::Completed(reply),
                Err(e) => ReplyEvent::Failed {
                    message: e.to_string(),
                },
            }
        };
        let _ = sender.send(event).await;
    }

    async fn persist(&self, state: &SessionState) {
        let threads = state.sorted_threads();
        let raw = match serde_json::to_string(&threads) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize chat threads");
                return;
            }
        };
        if let Err(e) = self.store.set(THREADS_KEY, &raw).await {
            tracing::warn!(error = %e, "Failed to persist chat threads");
        }
    }
}
