//! In-memory conversation history.
//!
//! Append-only apart from [`Transcript::clear`]. Only user and assistant
//! turns are recorded; the system instruction is added per request.

use bfi_domain::message::{Message, Role};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
    /// When the entry was appended. Display only, never sent to the model.
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Role::User, content.into());
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Role::Assistant, content.into());
    }

    fn push(&mut self, role: Role, content: String) {
        self.entries.push(TranscriptEntry {
            role,
            content,
            at: Utc::now(),
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Role/content pairs in conversation order, as sent to the model.
    pub fn to_messages(&self) -> Vec<Message> {
        self.entries
            .iter()
            .map(|e| Message {
                role: e.role,
                content: e.content.clone(),
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_conversation_order() {
        let mut t = Transcript::new();
        t.push_assistant("What do you want to build?");
        t.push_user("A chore tracker");
        t.push_assistant("Who is it for?");

        let roles: Vec<Role> = t.entries().iter().map(|e| e.role).collect();
        assert_eq!(roles, [Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(t.last().unwrap().content, "Who is it for?");
    }

    #[test]
    fn messages_drop_timestamps() {
        let mut t = Transcript::new();
        t.push_user("hi");
        assert_eq!(t.to_messages(), vec![Message::user("hi")]);
    }

    #[test]
    fn clear_empties() {
        let mut t = Transcript::new();
        t.push_user("hi");
        t.clear();
        assert!(t.is_empty());
        assert!(t.to_messages().is_empty());
    }
}
