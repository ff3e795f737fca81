// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types and common state types used across the relaychat workspace.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Client-generated message identifier (`MSG-17000-aZ09xy-00000` style).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        MessageId(value.to_string())
    }
}

impl From<String> for MessageId {
    fn from(value: String) -> Self {
        MessageId(value)
    }
}

/// A chat message as it travels over REST and the socket.
///
/// Every field is a JSON string on the wire, including `date`, which holds
/// milliseconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub sender_id: String,
    pub message_id: MessageId,
    pub message: String,
    pub date: String,
}

impl ChatMessage {
    /// Builds a message stamped with `date_millis`.
    pub fn new(
        sender_id: impl Into<String>,
        message_id: MessageId,
        message: impl Into<String>,
        date_millis: i64,
    ) -> Self {
        Self {
            sender_id: sender_id.into(),
            message_id,
            message: message.into(),
            date: date_millis.to_string(),
        }
    }

    /// Parses `date` as epoch milliseconds.
    ///
    /// An empty date counts as the epoch. Fractional values are truncated.
    /// Returns `None` when the date is not a finite number.
    pub fn timestamp_millis(&self) -> Option<i64> {
        let raw = self.date.trim();
        if raw.is_empty() {
            return Some(0);
        }
        if let Ok(ms) = raw.parse::<i64>() {
            return Some(ms);
        }
        match raw.parse::<f64>() {
            Ok(ms) if ms.is_finite() && ms.abs() < i64::MAX as f64 => Some(ms.trunc() as i64),
            _ => None,
        }
    }
}

/// Socket connectivity, owned exclusively by the connection manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
    Error,
}

impl ConnectionState {
    /// Whether a connection attempt is in flight or established.
    pub fn is_active(self) -> bool {
        matches!(self, ConnectionState::Connecting | ConnectionState::Open)
    }
}

/// Screen-level phase of a chat session.
///
/// `Idle -> Fetching -> Connecting -> Live <-> Reconnecting`, where
/// `Reconnecting` returns to `Fetching` through a full session reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Fetching,
    Connecting,
    Live,
    Reconnecting,
}

/// User-visible connection status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerStatus {
    Loading,
    Connected,
    Disconnected,
    SocketError,
    /// A REST fetch or delete failed. Stays until the next connectivity change.
    RequestFailed(String),
}

impl ServerStatus {
    /// Whether the status should be rendered as a problem.
    pub fn is_problem(&self) -> bool {
        !matches!(self, ServerStatus::Loading | ServerStatus::Connected)
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerStatus::Loading => write!(f, "Loading..."),
            ServerStatus::Connected => write!(f, "Connected"),
            ServerStatus::Disconnected => write!(f, "Disconnected. Check internet or server!"),
            ServerStatus::SocketError => write!(f, "WebSocket error occurred."),
            ServerStatus::RequestFailed(reason) => write!(f, "Request failed: {reason}"),
        }
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of relay adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    MessageSource,
    SocketTransport,
}

/// Messages sharing one calendar day, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    /// `Thursday 01/01/1970` style label, or `Invalid date`.
    pub label: String,
    pub messages: Vec<ChatMessage>,
}

/// Day-bucketed presentation view derived from the message store.
///
/// Groups appear in the order their label first occurs in the source sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedView {
    pub groups: Vec<DayGroup>,
}

impl GroupedView {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of messages across all groups.
    pub fn message_count(&self) -> usize {
        self.groups.iter().map(|g| g.messages.len()).sum()
    }

    /// Looks up a group by its day label.
    pub fn group(&self, label: &str) -> Option<&DayGroup> {
        self.groups.iter().find(|g| g.label == label)
    }

    /// The last message of the last group, which the presenter scrolls to.
    pub fn latest(&self) -> Option<&ChatMessage> {
        self.groups.last().and_then(|g| g.messages.last())
    }
}
