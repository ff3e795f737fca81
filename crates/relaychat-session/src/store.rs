// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The session's message snapshot.

use relaychat_core::{ChatMessage, MessageId};

/// Holds the most recent message snapshot for one chat session.
///
/// There is no insert: a sent message shows up only once a later
/// snapshot from the relay contains it.
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    messages: Vec<ChatMessage>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the held set with `snapshot`. The last snapshot received wins.
    pub fn replace(&mut self, snapshot: Vec<ChatMessage>) {
        self.messages = snapshot;
    }

    /// Removes every message with `id`. Returns whether anything was removed.
    pub fn remove_by_id(&mut self, id: &MessageId) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| &m.message_id != id);
        self.messages.len() != before
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn get(&self, id: &MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| &m.message_id == id)
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
