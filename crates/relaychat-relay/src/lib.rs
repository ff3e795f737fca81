// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relay adapters for the relaychat client.
//!
//! [`RestRelayClient`] is the pull channel (reqwest) and [`WsTransport`]
//! the push channel (tokio-tungstenite).

pub mod rest;
pub mod ws;

pub use rest::{parse_base_url, RestRelayClient};
pub use ws::{parse_socket_url, WsTransport};
