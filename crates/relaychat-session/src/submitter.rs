// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound commands: sending the draft over the socket and deleting over REST.

use relaychat_core::{ChatMessage, MessageId, MessageSource, RelayChatError};
use tracing::{debug, info};

use crate::connection::ConnectionManager;
use crate::ids::{now_millis, MessageIdGenerator};

/// Draft state and message construction for one user.
#[derive(Debug)]
pub struct OutboundSubmitter {
    sender_id: String,
    ids: MessageIdGenerator,
    draft: String,
    input_empty: bool,
}

impl OutboundSubmitter {
    pub fn new(sender_id: impl Into<String>, id_prefix: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            ids: MessageIdGenerator::new(id_prefix),
            draft: String::new(),
            input_empty: true,
        }
    }

    /// Stores the raw draft text.
    pub fn on_change(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.input_empty = self.draft.trim().is_empty();
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// True when the draft is empty or whitespace only.
    pub fn input_empty(&self) -> bool {
        self.input_empty
    }

    /// Whether `submit` would write a frame right now.
    pub fn can_send(&self, conn: &ConnectionManager) -> bool {
        !self.input_empty && conn.can_submit()
    }

    /// Sends the draft as a new message.
    ///
    /// Does nothing for an empty draft. Otherwise the draft is cleared before
    /// the write, so a dropped submission is gone rather than retried. The
    /// text is sent exactly as typed, surrounding whitespace included.
    pub fn submit(&mut self, conn: &ConnectionManager) -> Result<Option<ChatMessage>, RelayChatError> {
        if self.input_empty {
            return Ok(None);
        }

        let text = std::mem::take(&mut self.draft);
        self.input_empty = true;

        let message = ChatMessage::new(&self.sender_id, self.ids.generate(), text, now_millis());
        let frame = serde_json::to_string(&message)
            .map_err(|e| RelayChatError::Internal(format!("failed to encode message: {e}")))?;
        conn.send_text(frame)?;
        debug!(message_id = %message.message_id, "message sent");
        Ok(Some(message))
    }

    /// Replaces the draft with `text` and submits it.
    pub fn submit_message(
        &mut self,
        text: impl Into<String>,
        conn: &ConnectionManager,
    ) -> Result<Option<ChatMessage>, RelayChatError> {
        self.on_change(text);
        self.submit(conn)
    }

    /// Whether `message` was written by this user.
    pub fn is_own(&self, message: &ChatMessage) -> bool {
        is_own(message, &self.sender_id)
    }
}

/// Whether `message` was written by `sender_id`.
pub fn is_own(message: &ChatMessage, sender_id: &str) -> bool {
    message.sender_id == sender_id
}

/// Deletes one message through the REST side.
pub async fn delete_message(source: &dyn MessageSource, id: &MessageId) -> Result<(), RelayChatError> {
    source.delete_message(id).await?;
    info!(message_id = %id, source = source.name(), "message deleted");
    Ok(())
}
