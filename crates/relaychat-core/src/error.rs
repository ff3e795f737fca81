// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the relaychat client.

use thiserror::Error;

use crate::types::ConnectionState;

/// The primary error type used across relaychat adapters and the chat session.
///
/// None of these are fatal to a running session: each is caught where it
/// happens and turned into a log line or a [`ServerStatus`](crate::ServerStatus).
#[derive(Debug, Error)]
pub enum RelayChatError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// A relay endpoint could not be used (bad URL, wrong scheme).
    #[error("invalid endpoint `{endpoint}`: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Socket-level failure (handshake, I/O, remote close with error).
    #[error("connection error: {message}")]
    Connection {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An inbound frame was not a valid message snapshot.
    #[error("malformed frame: {source}")]
    MalformedFrame {
        #[source]
        source: serde_json::Error,
    },

    /// REST request failure (transport error or non-success status).
    #[error("fetch error: {message}")]
    Fetch {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A send was attempted while the socket was not open. The message is discarded.
    #[error("submission dropped: socket is {state}")]
    SubmissionDropped { state: ConnectionState },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayChatError {
    /// Builds a [`RelayChatError::Fetch`] without an underlying source.
    pub fn fetch(message: impl Into<String>) -> Self {
        RelayChatError::Fetch {
            message: message.into(),
            source: None,
        }
    }

    /// Builds a [`RelayChatError::Connection`] without an underlying source.
    pub fn connection(message: impl Into<String>) -> Self {
        RelayChatError::Connection {
            message: message.into(),
            source: None,
        }
    }
}
