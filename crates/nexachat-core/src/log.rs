//! Append-only message log of one room visit.

use crate::protocol::ChatPayload;

/// Sender reserved for locally or relay-synthesized notices.
pub const SYSTEM_SENDER: &str = "System";

/// Text of the entry every log starts with.
pub const WELCOME_MESSAGE: &str = "Welcome to the chat room!";

/// One rendered chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub message: String,
    pub name: String,
}

/// Who an entry belongs to, from the local participant's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrigin {
    System,
    Own,
    Peer,
}

impl ChatEntry {
    pub fn new(message: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            name: name.into(),
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self::new(message, SYSTEM_SENDER)
    }

    pub fn is_system(&self) -> bool {
        self.name == SYSTEM_SENDER
    }

    /// Classify for rendering. `own_name` is the committed local name, if any.
    pub fn origin(&self, own_name: Option<&str>) -> EntryOrigin {
        if self.is_system() {
            EntryOrigin::System
        } else if own_name == Some(self.name.as_str()) {
            EntryOrigin::Own
        } else {
            EntryOrigin::Peer
        }
    }
}

impl From<ChatPayload> for ChatEntry {
    fn from(p: ChatPayload) -> Self {
        Self {
            message: p.message,
            name: p.name,
        }
    }
}

/// Insertion-ordered log. Entries are never reordered or removed.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: Vec<ChatEntry>,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageLog {
    /// A log seeded with the System welcome entry.
    pub fn new() -> Self {
        Self {
            entries: vec![ChatEntry::system(WELCOME_MESSAGE)],
        }
    }

    pub fn append(&mut self, entry: ChatEntry) {
        self.entries.push(entry);
    }

    /// Ordered view over every entry; call again to restart.
    pub fn all(&self) -> std::slice::Iter<'_, ChatEntry> {
        self.entries.iter()
    }

    /// Entries appended at or after position `from` (for incremental rendering).
    pub fn since(&self, from: usize) -> &[ChatEntry] {
        self.entries.get(from..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ChatEntry> {
        self.entries.last()
    }
}
