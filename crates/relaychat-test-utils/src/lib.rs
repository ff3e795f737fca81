// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for relaychat integration tests.
//!
//! Provides mock relay adapters and recording collaborators for fast,
//! deterministic tests without a running relay.
//!
//! # Components
//!
//! - [`MockMessageSource`] - In-memory REST side with failure injection
//! - [`MockSocketTransport`] - Scriptable socket transport that captures outbound frames
//! - [`RecordingPresenter`] / [`RecordingNavigator`] - Capture what the session reports

pub mod mock_source;
pub mod mock_transport;
pub mod recording;

pub use mock_source::MockMessageSource;
pub use mock_transport::MockSocketTransport;
pub use recording::{RecordingNavigator, RecordingPresenter};

use relaychat_core::{ChatMessage, MessageId};

/// Builds a message with the given id and epoch-millisecond date.
pub fn message(sender_id: &str, id: &str, text: &str, date_millis: i64) -> ChatMessage {
    ChatMessage::new(sender_id, MessageId::from(id), text, date_millis)
}
