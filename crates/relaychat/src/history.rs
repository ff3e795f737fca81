// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `relaychat history` and `relaychat delete` command implementations.
//!
//! Both are one-shot REST calls; no socket is opened.

use std::io::IsTerminal;

use relaychat_config::RelayChatConfig;
use relaychat_core::{MessageId, MessageSource, RelayChatError};
use relaychat_relay::RestRelayClient;
use relaychat_session::{day_offset, delete_message, group_by_day};

use crate::render::{format_view, RenderStyle};

/// Fetches the message list once and prints it grouped by day.
pub async fn run_history(config: &RelayChatConfig, plain: bool) -> Result<(), RelayChatError> {
    let client = RestRelayClient::from_config(&config.relay)?;
    let messages = client.fetch_messages().await?;

    let style = RenderStyle {
        offset: day_offset(config.session.day_offset_minutes)?,
        own_sender: config.session.user_id.clone(),
        use_color: !plain && std::io::stdout().is_terminal(),
    };
    let view = group_by_day(&messages, style.offset);
    print!("{}", format_view(&view, &style));
    Ok(())
}

/// Deletes one message.
pub async fn run_delete(config: &RelayChatConfig, id: &str) -> Result<(), RelayChatError> {
    let client = RestRelayClient::from_config(&config.relay)?;
    let id = MessageId::from(id);
    delete_message(&client, &id).await?;
    println!("deleted {id}");
    Ok(())
}
