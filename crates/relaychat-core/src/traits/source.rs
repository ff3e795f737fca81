// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pull channel: REST access to the relay's message feed.

use async_trait::async_trait;

use crate::error::RelayChatError;
use crate::traits::adapter::RelayAdapter;
use crate::types::{ChatMessage, MessageId};

/// REST side of the relay.
#[async_trait]
pub trait MessageSource: RelayAdapter {
    /// Fetches the full message snapshot (`GET <base>/`).
    async fn fetch_messages(&self) -> Result<Vec<ChatMessage>, RelayChatError>;

    /// Deletes one message (`DELETE <base>/<id>`). Any success status counts.
    async fn delete_message(&self, id: &MessageId) -> Result<(), RelayChatError>;
}
