//! Chat messages and the in-memory message log.

use chrono::{DateTime, Utc};

/// Who authored a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Gemini",
        }
    }
}

/// A single chat message.  Immutable once appended to a [`MessageLog`].
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Creation time in milliseconds since the Unix epoch, as a string.
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only, session-scoped list of messages.
///
/// Assigns ids from the creation timestamp.  Two messages created in the same
/// millisecond get consecutive ids, so ids stay unique and increasing.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
    last_id: i64,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new message stamped with the current time and return it.
    pub fn push(&mut self, role: Role, content: impl Into<String>) -> &Message {
        let timestamp = Utc::now();
        let id = timestamp.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;

        self.messages.push(Message {
            id: id.to_string(),
            role,
            content: content.into(),
            timestamp,
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop every message.  Ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
