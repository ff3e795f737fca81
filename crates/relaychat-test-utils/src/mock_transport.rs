// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scriptable socket transport.
//!
//! `MockSocketTransport` records every `open` and hands the test the event
//! sender of each attempt. Tests drive the socket lifecycle with
//! `emit_open`, `emit_snapshot`, `emit_error` and `emit_close`, which always
//! target the most recent attempt, and read back outbound frames with
//! `sent_frames`.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::mpsc;

use relaychat_core::socket::{SocketEventKind, SocketEventSender, SocketHandle};
use relaychat_core::traits::{RelayAdapter, SocketTransport};
use relaychat_core::types::{AdapterType, ChatMessage, HealthStatus};
use relaychat_core::RelayChatError;

struct MockConnection {
    endpoint: String,
    events: SocketEventSender,
    outbound: mpsc::UnboundedReceiver<String>,
}

#[derive(Default)]
struct TransportState {
    connections: Vec<MockConnection>,
    sent: Vec<String>,
    fail_next_open: Option<String>,
    auto_open: bool,
}

/// A mock socket transport for testing.
#[derive(Clone, Default)]
pub struct MockSocketTransport {
    state: Arc<Mutex<TransportState>>,
}

impl MockSocketTransport {
    /// Create a transport whose sockets stay `connecting` until `emit_open`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that reports `Open` as soon as a socket is opened.
    pub fn auto_open() -> Self {
        let transport = Self::new();
        transport.lock().auto_open = true;
        transport
    }

    fn lock(&self) -> MutexGuard<'_, TransportState> {
        // A poisoned lock only means another test thread panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, kind: SocketEventKind) -> bool {
        self.lock()
            .connections
            .last()
            .is_some_and(|c| c.events.emit(kind))
    }

    /// Make the next `open` fail synchronously with `reason`.
    pub fn fail_next_open(&self, reason: impl Into<String>) {
        self.lock().fail_next_open = Some(reason.into());
    }

    /// Number of `open` calls that produced a socket.
    pub fn open_count(&self) -> usize {
        self.lock().connections.len()
    }

    /// Endpoints passed to `open`, in order.
    pub fn endpoints(&self) -> Vec<String> {
        self.lock()
            .connections
            .iter()
            .map(|c| c.endpoint.clone())
            .collect()
    }

    /// Generation of the latest attempt.
    pub fn latest_generation(&self) -> Option<u64> {
        self.lock().connections.last().map(|c| c.events.generation())
    }

    /// Report a completed handshake on the latest socket.
    pub fn emit_open(&self) -> bool {
        self.emit(SocketEventKind::Open)
    }

    /// Deliver a raw text frame on the latest socket.
    pub fn emit_frame(&self, text: impl Into<String>) -> bool {
        self.emit(SocketEventKind::Frame(text.into()))
    }

    /// Deliver a full snapshot frame on the latest socket.
    pub fn emit_snapshot(&self, messages: &[ChatMessage]) -> bool {
        match serde_json::to_string(messages) {
            Ok(frame) => self.emit_frame(frame),
            Err(_) => false,
        }
    }

    /// Report a socket error on the latest socket.
    pub fn emit_error(&self, reason: impl Into<String>) -> bool {
        self.emit(SocketEventKind::Error(reason.into()))
    }

    /// Report that the latest socket closed.
    pub fn emit_close(&self) -> bool {
        self.emit(SocketEventKind::Close)
    }

    /// All frames written through any socket handle so far.
    pub fn sent_frames(&self) -> Vec<String> {
        let mut state = self.lock();
        let state = &mut *state;
        for conn in &mut state.connections {
            while let Ok(frame) = conn.outbound.try_recv() {
                state.sent.push(frame);
            }
        }
        state.sent.clone()
    }

    /// Outbound frames parsed as single messages. Unparsable frames are skipped.
    pub fn sent_messages(&self) -> Vec<ChatMessage> {
        self.sent_frames()
            .iter()
            .filter_map(|f| serde_json::from_str(f).ok())
            .collect()
    }
}

#[async_trait]
impl RelayAdapter for MockSocketTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SocketTransport
    }

    async fn health_check(&self) -> Result<HealthStatus, RelayChatError> {
        Ok(HealthStatus::Healthy)
    }
}

impl SocketTransport for MockSocketTransport {
    fn open(
        &self,
        endpoint: &str,
        events: SocketEventSender,
    ) -> Result<SocketHandle, RelayChatError> {
        let mut state = self.lock();
        if let Some(reason) = state.fail_next_open.take() {
            return Err(RelayChatError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason,
            });
        }

        let (tx, rx) = mpsc::unbounded_channel();
        if state.auto_open {
            events.emit(SocketEventKind::Open);
        }
        tracing::debug!(endpoint, generation = events.generation(), "mock socket opened");
        state.connections.push(MockConnection {
            endpoint: endpoint.to_string(),
            events,
            outbound: rx,
        });
        Ok(SocketHandle::new(tx, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaychat_core::SocketEvent;

    #[tokio::test]
    async fn events_target_latest_attempt() {
        let transport = MockSocketTransport::new();
        let (tx, mut rx) = mpsc::unbounded_channel::<SocketEvent>();

        let _first = transport
            .open("ws://relay/", SocketEventSender::new(1, tx.clone()))
            .unwrap();
        let _second = transport
            .open("ws://relay/", SocketEventSender::new(2, tx))
            .unwrap();

        assert!(transport.emit_open());
        let event = rx.recv().await.unwrap();
        assert_eq!(event.generation, 2);
        assert_eq!(event.kind, SocketEventKind::Open);
        assert_eq!(transport.open_count(), 2);
        assert_eq!(transport.latest_generation(), Some(2));
    }

    #[tokio::test]
    async fn captures_frames_from_dropped_handles() {
        let transport = MockSocketTransport::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = transport
            .open("ws://relay/", SocketEventSender::new(1, tx))
            .unwrap();
        handle.send_text("one".into()).unwrap();
        drop(handle);
        assert_eq!(transport.sent_frames(), vec!["one".to_string()]);
        assert_eq!(transport.sent_frames().len(), 1);
    }

    #[tokio::test]
    async fn fail_next_open_is_one_shot() {
        let transport = MockSocketTransport::auto_open();
        let (tx, mut rx) = mpsc::unbounded_channel();
        transport.fail_next_open("refused");
        assert!(
            transport
                .open("ws://relay/", SocketEventSender::new(1, tx.clone()))
                .is_err()
        );
        assert!(
            transport
                .open("ws://relay/", SocketEventSender::new(2, tx))
                .is_ok()
        );
        assert_eq!(rx.recv().await.unwrap().kind, SocketEventKind::Open);
    }
}
