// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `relaychat status` command implementation.
//!
//! Runs the health check of each relay adapter and prints the result.

use std::io::IsTerminal;

use relaychat_config::RelayChatConfig;
use relaychat_core::{HealthStatus, RelayAdapter, RelayChatError};
use relaychat_relay::{RestRelayClient, WsTransport};
use serde::Serialize;

/// Health of one adapter, for `--json` output.
#[derive(Debug, Serialize)]
pub struct AdapterStatus {
    pub name: String,
    pub kind: String,
    pub endpoint: String,
    pub healthy: bool,
    pub detail: Option<String>,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub healthy: bool,
    pub adapters: Vec<AdapterStatus>,
}

async fn check(adapter: &dyn RelayAdapter, endpoint: &str) -> AdapterStatus {
    let (healthy, detail) = match adapter.health_check().await {
        Ok(HealthStatus::Healthy) => (true, None),
        Ok(HealthStatus::Degraded(reason)) => (false, Some(reason)),
        Ok(HealthStatus::Unhealthy(reason)) => (false, Some(reason)),
        Err(e) => (false, Some(e.to_string())),
    };
    AdapterStatus {
        name: adapter.name().to_string(),
        kind: adapter.adapter_type().to_string(),
        endpoint: endpoint.to_string(),
        healthy,
        detail,
    }
}

/// Run the `relaychat status` command.
pub async fn run_status(
    config: &RelayChatConfig,
    json: bool,
    plain: bool,
) -> Result<(), RelayChatError> {
    let rest = RestRelayClient::from_config(&config.relay)?;
    let socket = WsTransport::from_config(&config.relay);

    let adapters = vec![
        check(&rest, &config.relay.base_url).await,
        check(&socket, &config.relay.socket_url).await,
    ];
    let response = StatusResponse {
        healthy: adapters.iter().all(|a| a.healthy),
        adapters,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_status(&response, use_color);
    }
    Ok(())
}

fn print_status(response: &StatusResponse, use_color: bool) {
    println!();
    println!("  relaychat status");
    println!("  {}", "-".repeat(35));

    for adapter in &response.adapters {
        let mark = match (adapter.healthy, use_color) {
            (true, true) => {
                use colored::Colorize;
                "✓".green().to_string()
            }
            (false, true) => {
                use colored::Colorize;
                "✗".red().to_string()
            }
            (true, false) => "[OK]".to_string(),
            (false, false) => "[FAIL]".to_string(),
        };
        println!("    {:<10} {mark} {}", adapter.name, adapter.endpoint);
        if let Some(detail) = &adapter.detail {
            println!("               {detail}");
        }
    }

    println!();
}
