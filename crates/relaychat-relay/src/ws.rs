// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket transport over tokio-tungstenite.
//!
//! Each `open` spawns one task that performs the handshake and then pumps
//! frames in both directions until either side goes away. The task always
//! finishes by emitting `Close`, also when the handshake fails.

use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use relaychat_config::model::RelayConfig;
use relaychat_core::{
    AdapterType, HealthStatus, RelayAdapter, RelayChatError, SocketEventKind, SocketEventSender,
    SocketHandle, SocketTransport,
};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};
use url::Url;

/// Handshake timeout used when none is configured.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Parses a socket endpoint, accepting only `ws` and `wss`.
pub fn parse_socket_url(endpoint: &str) -> Result<Url, RelayChatError> {
    let url = Url::parse(endpoint).map_err(|e| RelayChatError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(RelayChatError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("expected ws or wss, got {other}"),
        }),
    }
}

/// Socket transport implementing [`SocketTransport`].
#[derive(Debug, Clone)]
pub struct WsTransport {
    socket_url: String,
    connect_timeout: Duration,
}

impl WsTransport {
    /// `socket_url` is only used by the health check; `open` takes its own endpoint.
    pub fn new(socket_url: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            socket_url: socket_url.into(),
            connect_timeout,
        }
    }

    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.socket_url.clone(), config.request_timeout())
    }
}

impl Default for WsTransport {
    fn default() -> Self {
        Self::new(String::new(), DEFAULT_CONNECT_TIMEOUT)
    }
}

#[async_trait]
impl RelayAdapter for WsTransport {
    fn name(&self) -> &str {
        "websocket"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::SocketTransport
    }

    async fn health_check(&self) -> Result<HealthStatus, RelayChatError> {
        let url = parse_socket_url(&self.socket_url)?;
        match timeout(self.connect_timeout, connect_async(url.as_str())).await {
            Ok(Ok((mut stream, _))) => {
                let _ = stream.close(None).await;
                Ok(HealthStatus::Healthy)
            }
            Ok(Err(e)) => Ok(HealthStatus::Unhealthy(e.to_string())),
            Err(_) => Ok(HealthStatus::Unhealthy(format!(
                "handshake timed out after {:?}",
                self.connect_timeout
            ))),
        }
    }
}

impl SocketTransport for WsTransport {
    fn open(
        &self,
        endpoint: &str,
        events: SocketEventSender,
    ) -> Result<SocketHandle, RelayChatError> {
        let url = parse_socket_url(endpoint)?;
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_socket(url, events, outbound_rx, self.connect_timeout));
        Ok(SocketHandle::new(outbound_tx, Some(task)))
    }
}

async fn run_socket(
    url: Url,
    events: SocketEventSender,
    mut outbound: mpsc::UnboundedReceiver<String>,
    connect_timeout: Duration,
) {
    let generation = events.generation();
    let stream = match timeout(connect_timeout, connect_async(url.as_str())).await {
        Ok(Ok((stream, response))) => {
            debug!(generation, status = %response.status(), "handshake complete");
            stream
        }
        Ok(Err(e)) => {
            warn!(generation, error = %e, "handshake failed");
            events.emit(SocketEventKind::Error(e.to_string()));
            events.emit(SocketEventKind::Close);
            return;
        }
        Err(_) => {
            warn!(generation, "handshake timed out");
            events.emit(SocketEventKind::Error(format!(
                "handshake timed out after {connect_timeout:?}"
            )));
            events.emit(SocketEventKind::Close);
            return;
        }
    };

    if !events.emit(SocketEventKind::Open) {
        return;
    }

    let (mut sink, mut stream) = stream.split();
    loop {
        tokio::select! {
            frame = outbound.recv() => match frame {
                Some(text) => {
                    if let Err(e) = sink.send(Message::text(text)).await {
                        events.emit(SocketEventKind::Error(e.to_string()));
                        break;
                    }
                }
                None => {
                    let _ = sink.close().await;
                    break;
                }
            },
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if !events.emit(SocketEventKind::Frame(text.as_str().to_owned())) {
                        break;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    debug!(generation, ?frame, "close frame received");
                    break;
                }
                // Binary, ping and pong frames carry nothing for us.
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    events.emit(SocketEventKind::Error(e.to_string()));
                    break;
                }
                None => break,
            },
        }
    }

    events.emit(SocketEventKind::Close);
}
