use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::{mpsc, watch};

use crate::domain::{ChatMessage, ThreadId};

/// One step of a streamed reply. A stream ends with exactly one of the
/// terminal variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyEvent {
    /// `delta` is the new text; `text` is everything produced so far.
    Delta { delta: String, text: String },
    Completed(ChatMessage),
    /// `partial` is the materialized message, if any text was produced.
    Cancelled { partial: Option<ChatMessage> },
    Failed { message: String },
}

impl ReplyEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReplyEvent::Delta { .. })
    }
}

/// Token that stops an in-flight reply. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub(crate) fn new() -> (Self, watch::Receiver<bool>) {
        let (sender, receiver) = watch::channel(false);
        (
            Self {
                sender: Arc::new(sender),
            },
            receiver,
        )
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

/// Reply events for one turn. Dropping the stream cancels the turn.
#[derive(Debug)]
pub struct ReplyStream {
    thread_id: ThreadId,
    receiver: mpsc::Receiver<ReplyEvent>,
    cancel: CancelHandle,
}

impl ReplyStream {
    pub(crate) fn new(
        thread_id: ThreadId,
        receiver: mpsc::Receiver<ReplyEvent>,
        cancel: CancelHandle,
    ) -> Self {
        Self {
            thread_id,
            receiver,
            cancel,
        }
    }

    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Stream for ReplyStream {
    type Item = ReplyEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}
