use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ChatMessage, MessageId, ThreadId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatThread {
    pub id: ThreadId,
    pub assistant_id: String,
    pub assistant_name: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatThread {
    pub fn new(assistant_id: String, assistant_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: ThreadId::new(),
            assistant_id,
            assistant_name,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn position_of(&self, id: &MessageId) -> Option<usize> {
        self.messages.iter().position(|m| &m.id == id)
    }

    /// Swaps the message with the given id in place. Returns false when absent.
    pub fn replace_message(&mut self, id: &MessageId, message: ChatMessage) -> bool {
        match self.position_of(id) {
            Some(index) => {
                self.messages[index] = message;
                true
            }
            None => false,
        }
    }

    pub fn remove_message(&mut self, id: &MessageId) -> Option<ChatMessage> {
        self.position_of(id).map(|index| self.messages.remove(index))
    }

    /// Keeps messages `0..=index` and drops the rest.
    pub fn truncate_after(&mut self, index: usize) {
        self.messages.truncate(index + 1);
    }

    /// Finished messages, in order, for sending to a model.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .filter(|m| !m.is_loading)
            .cloned()
            .collect()
    }
}
