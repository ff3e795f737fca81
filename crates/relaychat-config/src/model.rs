// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the relaychat client.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level relaychat configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to a relay on localhost.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayChatConfig {
    /// Client identity and logging.
    #[serde(default)]
    pub client: ClientConfig,

    /// Relay endpoints.
    #[serde(default)]
    pub relay: RelayConfig,

    /// Chat session behavior.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Client identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Display name used in the shell prompt.
    #[serde(default = "default_client_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: default_client_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_client_name() -> String {
    "relaychat".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Relay endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Base URL of the REST side (`GET <base>/`, `DELETE <base>/<id>`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// WebSocket endpoint (`ws://` or `wss://`).
    #[serde(default = "default_socket_url")]
    pub socket_url: String,

    /// Timeout for a single REST request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            socket_url: default_socket_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl RelayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080/".to_string()
}

fn default_socket_url() -> String {
    "ws://127.0.0.1:8080/".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Chat session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Sender id stamped on outgoing messages.
    #[serde(default = "default_user_id")]
    pub user_id: String,

    /// Prefix for generated message ids.
    #[serde(default = "default_message_id_prefix")]
    pub message_id_prefix: String,

    /// Fixed delay before reconnecting after a socket close, in milliseconds.
    #[serde(default = "default_reconnect_delay_ms")]
    pub reconnect_delay_ms: u64,

    /// UTC offset in minutes used for day grouping. Independent of the host timezone.
    #[serde(default)]
    pub day_offset_minutes: i32,

    /// Delay before asking the presenter to scroll after a new snapshot, in milliseconds.
    #[serde(default = "default_scroll_delay_ms")]
    pub scroll_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            message_id_prefix: default_message_id_prefix(),
            reconnect_delay_ms: default_reconnect_delay_ms(),
            day_offset_minutes: 0,
            scroll_delay_ms: default_scroll_delay_ms(),
        }
    }
}

impl SessionConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }
}

fn default_user_id() -> String {
    "local".to_string()
}

fn default_message_id_prefix() -> String {
    "MSG".to_string()
}

fn default_reconnect_delay_ms() -> u64 {
    1000
}

fn default_scroll_delay_ms() -> u64 {
    100
}
