// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Supervises the single socket of a chat session.
//!
//! Every connection attempt gets a fresh generation number and its own
//! [`SocketEventSender`]. Events tagged with an older generation belong to a
//! socket that has already been replaced and are ignored.

use std::sync::Arc;
use std::time::Duration;

use relaychat_core::socket::{SocketEvent, SocketEventKind, SocketEventSender, SocketHandle};
use relaychat_core::{ChatMessage, ConnectionState, RelayChatError, SocketTransport};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// What a socket event means for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionUpdate {
    /// The handshake completed; submission is enabled.
    Opened,
    /// A full message snapshot arrived.
    Snapshot(Vec<ChatMessage>),
    /// The socket reported an error; no reconnect was scheduled.
    Errored(String),
    /// The socket closed.
    Closed { reconnect_scheduled: bool },
    /// The event belonged to a replaced socket.
    Ignored,
}

/// Owns the socket handle, its state and the pending reconnect deadline.
pub struct ConnectionManager {
    transport: Arc<dyn SocketTransport>,
    endpoint: String,
    state: ConnectionState,
    generation: u64,
    handle: Option<SocketHandle>,
    events_tx: mpsc::UnboundedSender<SocketEvent>,
    reconnect_delay: Duration,
    reconnect_at: Option<Instant>,
}

impl ConnectionManager {
    /// Creates a manager in the `closed` state together with the receiver
    /// on which all of its sockets report events.
    pub fn new(
        transport: Arc<dyn SocketTransport>,
        endpoint: impl Into<String>,
        reconnect_delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SocketEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let manager = Self {
            transport,
            endpoint: endpoint.into(),
            state: ConnectionState::Closed,
            generation: 0,
            handle: None,
            events_tx,
            reconnect_delay,
            reconnect_at: None,
        };
        (manager, events_rx)
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether an outbound frame would be written right now.
    pub fn can_submit(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// When the pending reconnect is due, if one is scheduled.
    pub fn reconnect_deadline(&self) -> Option<Instant> {
        self.reconnect_at
    }

    /// Forgets the pending reconnect.
    pub fn clear_reconnect(&mut self) {
        self.reconnect_at = None;
    }

    fn schedule_reconnect(&mut self) -> bool {
        if self.reconnect_at.is_some() {
            return false;
        }
        self.reconnect_at = Some(Instant::now() + self.reconnect_delay);
        true
    }

    /// Starts a connection attempt.
    ///
    /// Returns `Ok(false)` without doing anything while an attempt is already
    /// connecting or open. If the transport refuses to even start, the state
    /// becomes `closed`, a reconnect is scheduled and the error is returned.
    pub fn connect(&mut self) -> Result<bool, RelayChatError> {
        if self.state.is_active() {
            debug!(state = %self.state, "connect skipped, socket already active");
            return Ok(false);
        }

        self.reconnect_at = None;
        self.generation += 1;
        self.state = ConnectionState::Connecting;
        let events = SocketEventSender::new(self.generation, self.events_tx.clone());

        match self.transport.open(&self.endpoint, events) {
            Ok(handle) => {
                info!(
                    generation = self.generation,
                    endpoint = %self.endpoint,
                    transport = self.transport.name(),
                    "connecting"
                );
                self.handle = Some(handle);
                Ok(true)
            }
            Err(e) => {
                self.state = ConnectionState::Closed;
                self.schedule_reconnect();
                Err(e)
            }
        }
    }

    /// Applies one socket event to the connection state.
    ///
    /// A frame that is not a JSON array of messages is logged and returned as
    /// [`RelayChatError::MalformedFrame`]; the state is left untouched.
    pub fn handle_event(&mut self, event: SocketEvent) -> Result<ConnectionUpdate, RelayChatError> {
        if event.generation != self.generation {
            debug!(
                event_generation = event.generation,
                current = self.generation,
                "ignoring event from replaced socket"
            );
            return Ok(ConnectionUpdate::Ignored);
        }

        match event.kind {
            SocketEventKind::Open => {
                self.state = ConnectionState::Open;
                info!(generation = self.generation, "socket open");
                Ok(ConnectionUpdate::Opened)
            }
            SocketEventKind::Frame(text) => {
                match serde_json::from_str::<Vec<ChatMessage>>(&text) {
                    Ok(snapshot) => {
                        debug!(generation = self.generation, count = snapshot.len(), "snapshot received");
                        Ok(ConnectionUpdate::Snapshot(snapshot))
                    }
                    Err(source) => {
                        warn!(
                            generation = self.generation,
                            error = %source,
                            len = text.len(),
                            "dropping malformed frame"
                        );
                        Err(RelayChatError::MalformedFrame { source })
                    }
                }
            }
            SocketEventKind::Error(reason) => {
                self.state = ConnectionState::Error;
                warn!(generation = self.generation, %reason, "socket error");
                Ok(ConnectionUpdate::Errored(reason))
            }
            SocketEventKind::Close => {
                self.state = ConnectionState::Closed;
                self.handle = None;
                let reconnect_scheduled = self.schedule_reconnect();
                info!(
                    generation = self.generation,
                    reconnect_scheduled,
                    delay_ms = self.reconnect_delay.as_millis() as u64,
                    "socket closed"
                );
                Ok(ConnectionUpdate::Closed { reconnect_scheduled })
            }
        }
    }

    /// Writes a text frame to the open socket.
    pub fn send_text(&self, frame: String) -> Result<(), RelayChatError> {
        match (&self.handle, self.state) {
            (Some(handle), ConnectionState::Open) => handle.send_text(frame),
            (_, state) => Err(RelayChatError::SubmissionDropped { state }),
        }
    }

    /// Tears the socket down without scheduling a reconnect.
    ///
    /// Late events from the torn-down socket are ignored afterwards.
    pub fn disconnect(&mut self) {
        self.reconnect_at = None;
        if let Some(handle) = self.handle.take() {
            handle.close();
            info!(generation = self.generation, "socket disconnected");
        }
        self.generation += 1;
        self.state = ConnectionState::Closed;
    }
}
