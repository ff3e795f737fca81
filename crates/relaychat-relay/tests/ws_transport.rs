// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket transport against an in-process tungstenite server.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use relaychat_core::{
    HealthStatus, RelayAdapter, SocketEvent, SocketEventKind, SocketEventSender, SocketTransport,
};
use relaychat_relay::WsTransport;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

const SNAPSHOT: &str = r#"[{"senderId":"u1","messageId":"MSG-1","message":"hi","date":"1000"}]"#;

/// Accepts one connection, pushes a snapshot and forwards the first client
/// text frame to `received`, then closes.
async fn serve_once(received: mpsc::UnboundedSender<String>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(tcp).await.unwrap();
        ws.send(Message::text(SNAPSHOT)).await.unwrap();
        ws.send(Message::binary(vec![1u8, 2, 3])).await.unwrap();
        while let Some(Ok(msg)) = ws.next().await {
            if let Message::Text(text) = msg {
                let _ = received.send(text.as_str().to_owned());
                break;
            }
        }
        let _ = ws.close(None).await;
    });

    format!("ws://{addr}/")
}

async fn next_kind(rx: &mut mpsc::UnboundedReceiver<SocketEvent>) -> SocketEventKind {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event within timeout")
        .expect("event channel open")
        .kind
}

#[tokio::test]
async fn full_socket_lifecycle() {
    let (server_tx, mut server_rx) = mpsc::unbounded_channel();
    let endpoint = serve_once(server_tx).await;

    let transport = WsTransport::new(endpoint.clone(), Duration::from_secs(5));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = transport
        .open(&endpoint, SocketEventSender::new(3, tx))
        .unwrap();

    assert_eq!(next_kind(&mut rx).await, SocketEventKind::Open);
    assert_eq!(
        next_kind(&mut rx).await,
        SocketEventKind::Frame(SNAPSHOT.to_string())
    );

    handle.send_text(r#"{"hello":true}"#.to_string()).unwrap();
    let got = tokio::time::timeout(Duration::from_secs(5), server_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(got, r#"{"hello":true}"#);

    // The server closes after the first client frame; the binary frame was skipped.
    assert_eq!(next_kind(&mut rx).await, SocketEventKind::Close);
}

#[tokio::test]
async fn events_carry_generation() {
    let (server_tx, _server_rx) = mpsc::unbounded_channel();
    let endpoint = serve_once(server_tx).await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _handle = WsTransport::default()
        .open(&endpoint, SocketEventSender::new(42, tx))
        .unwrap();
    let event = rx.recv().await.unwrap();
    assert_eq!(event.generation, 42);
}

#[tokio::test]
async fn refused_handshake_emits_error_then_close() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _handle = WsTransport::default()
        .open(&format!("ws://127.0.0.1:{port}/"), SocketEventSender::new(1, tx))
        .unwrap();

    assert!(matches!(next_kind(&mut rx).await, SocketEventKind::Error(_)));
    assert_eq!(next_kind(&mut rx).await, SocketEventKind::Close);
}

#[tokio::test]
async fn health_check_against_live_server() {
    let (server_tx, _server_rx) = mpsc::unbounded_channel();
    let endpoint = serve_once(server_tx).await;
    let transport = WsTransport::new(endpoint, Duration::from_secs(5));
    assert_eq!(transport.health_check().await.unwrap(), HealthStatus::Healthy);
}
