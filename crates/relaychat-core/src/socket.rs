// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Socket event plumbing shared by transports and the connection manager.
//!
//! A transport reports lifecycle events for one connection attempt through a
//! [`SocketEventSender`] tagged with that attempt's generation, and accepts
//! outbound text frames through the [`SocketHandle`] it returns.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::RelayChatError;

/// What happened on a socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEventKind {
    /// Handshake completed.
    Open,
    /// A text frame arrived.
    Frame(String),
    /// The socket reported an error. A `Close` always follows.
    Error(String),
    /// The socket is gone.
    Close,
}

/// A socket event tagged with the connection attempt it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketEvent {
    pub generation: u64,
    pub kind: SocketEventKind,
}

/// Delivers events for a single connection attempt.
#[derive(Debug, Clone)]
pub struct SocketEventSender {
    generation: u64,
    tx: mpsc::UnboundedSender<SocketEvent>,
}

impl SocketEventSender {
    pub fn new(generation: u64, tx: mpsc::UnboundedSender<SocketEvent>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Emits an event. Returns `false` once the session stopped listening.
    pub fn emit(&self, kind: SocketEventKind) -> bool {
        self.tx
            .send(SocketEvent {
                generation: self.generation,
                kind,
            })
            .is_ok()
    }
}

/// Handle to one open (or opening) socket.
///
/// Dropping the handle aborts the transport task.
#[derive(Debug)]
pub struct SocketHandle {
    outbound: mpsc::UnboundedSender<String>,
    task: Option<JoinHandle<()>>,
}

impl SocketHandle {
    /// Wraps an outbound queue and the task that drives the socket, if any.
    pub fn new(outbound: mpsc::UnboundedSender<String>, task: Option<JoinHandle<()>>) -> Self {
        Self { outbound, task }
    }

    /// Queues a text frame for the socket writer.
    pub fn send_text(&self, text: String) -> Result<(), RelayChatError> {
        self.outbound
            .send(text)
            .map_err(|_| RelayChatError::connection("socket writer has stopped"))
    }

    /// Aborts the transport task without waiting for a close handshake.
    pub fn close(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for SocketHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sender_tags_events_with_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sender = SocketEventSender::new(7, tx);
        assert!(sender.emit(SocketEventKind::Open));
        let event = rx.recv().await.unwrap();
        assert_eq!(event.generation, 7);
        assert_eq!(event.kind, SocketEventKind::Open);
    }

    #[tokio::test]
    async fn emit_reports_closed_listener() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sender = SocketEventSender::new(1, tx);
        drop(rx);
        assert!(!sender.emit(SocketEventKind::Close));
    }

    #[tokio::test]
    async fn handle_queues_outbound_frames() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = SocketHandle::new(tx, None);
        handle.send_text("hello".into()).unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn handle_send_fails_after_writer_stops() {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = SocketHandle::new(tx, None);
        drop(rx);
        assert!(matches!(
            handle.send_text("hello".into()),
            Err(RelayChatError::Connection { .. })
        ));
    }
}
