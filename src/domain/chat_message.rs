use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MessageId, MessageRole};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_loading: bool,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: String) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content,
            timestamp: Utc::now(),
            is_loading: false,
        }
    }

    /// Empty assistant message shown while a reply is being produced.
    pub fn placeholder() -> Self {
        Self {
            is_loading: true,
            ..Self::new(MessageRole::Assistant, String::new())
        }
    }

    /// The placeholder turned into a finished reply. Id and timestamp are kept.
    pub fn materialize(&self, content: String) -> Self {
        Self {
            content,
            is_loading: false,
            ..self.clone()
        }
    }
}
