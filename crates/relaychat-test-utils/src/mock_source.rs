// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock REST side of the relay.
//!
//! `MockMessageSource` implements `MessageSource` over an in-memory message
//! list that tests mutate directly. Deletes remove from that list, so a
//! refetch after a delete observes the server's new state.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use relaychat_core::traits::{MessageSource, RelayAdapter};
use relaychat_core::types::{AdapterType, ChatMessage, HealthStatus, MessageId};
use relaychat_core::RelayChatError;

#[derive(Default)]
struct SourceState {
    messages: Vec<ChatMessage>,
    fetch_count: usize,
    deleted: Vec<MessageId>,
    failing_fetches: usize,
    fail_deletes: bool,
    fetch_delay: Option<Duration>,
}

/// A mock message source for testing.
///
/// Fetches return the server-side list as it was when the call started,
/// optionally after a configured delay.
#[derive(Clone, Default)]
pub struct MockMessageSource {
    state: Arc<Mutex<SourceState>>,
}

impl MockMessageSource {
    /// Create a mock source with an empty server-side list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source seeded with `messages`.
    pub fn with_messages(messages: Vec<ChatMessage>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SourceState {
                messages,
                ..SourceState::default()
            })),
        }
    }

    /// Replace the server-side list.
    pub async fn set_messages(&self, messages: Vec<ChatMessage>) {
        self.state.lock().await.messages = messages;
    }

    /// Current server-side list.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.state.lock().await.messages.clone()
    }

    /// Delay every subsequent fetch by `delay`.
    pub async fn set_fetch_delay(&self, delay: Duration) {
        self.state.lock().await.fetch_delay = Some(delay);
    }

    /// Make the next `count` fetches fail.
    pub async fn fail_next_fetches(&self, count: usize) {
        self.state.lock().await.failing_fetches = count;
    }

    /// Make every delete fail until switched back.
    pub async fn set_fail_deletes(&self, fail: bool) {
        self.state.lock().await.fail_deletes = fail;
    }

    /// Number of fetches started so far.
    pub async fn fetch_count(&self) -> usize {
        self.state.lock().await.fetch_count
    }

    /// Ids passed to `delete_message`, in call order, including failed ones.
    pub async fn deleted(&self) -> Vec<MessageId> {
        self.state.lock().await.deleted.clone()
    }
}

#[async_trait]
impl RelayAdapter for MockMessageSource {
    fn name(&self) -> &str {
        "mock-source"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::MessageSource
    }

    async fn health_check(&self) -> Result<HealthStatus, RelayChatError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl MessageSource for MockMessageSource {
    async fn fetch_messages(&self) -> Result<Vec<ChatMessage>, RelayChatError> {
        let (result, delay) = {
            let mut state = self.state.lock().await;
            state.fetch_count += 1;
            let result = if state.failing_fetches > 0 {
                state.failing_fetches -= 1;
                Err(RelayChatError::fetch("GET / returned 503 Service Unavailable"))
            } else {
                Ok(state.messages.clone())
            };
            (result, state.fetch_delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn delete_message(&self, id: &MessageId) -> Result<(), RelayChatError> {
        let mut state = self.state.lock().await;
        state.deleted.push(id.clone());
        if state.fail_deletes {
            return Err(RelayChatError::fetch(format!(
                "DELETE /{id} returned 500 Internal Server Error"
            )));
        }
        state.messages.retain(|m| &m.message_id != id);
        Ok(())
    }
}
