// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `relaychat chat` command implementation.
//!
//! Runs a chat session against the configured relay and reads input from a
//! readline prompt on a dedicated thread. Plain lines are sent as messages;
//! lines starting with `/` are commands.

use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use relaychat_config::RelayChatConfig;
use relaychat_core::{
    ChatMessage, GroupedView, MessageId, MessageSource, Navigator, Presenter, RelayChatError,
    ServerStatus, SessionPhase, SocketTransport,
};
use relaychat_relay::{RestRelayClient, WsTransport};
use relaychat_session::{
    day_offset, drain_session, install_signal_handler, is_own, ChatSession, SessionHandle,
    SessionSettings,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::render::{format_status, format_view, RenderStyle};

/// How long to wait for the session task after asking it to stop.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    /// Send the line as typed.
    Send(String),
    Delete(MessageId),
    Refresh,
    Help,
    Quit,
    Empty,
    /// A `/` line that is not a command, with a hint for the user.
    Invalid(String),
}

/// Classifies a line of input.
///
/// Messages keep their surrounding whitespace; only command detection looks
/// at the trimmed line.
pub fn parse_input(line: &str) -> ChatInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ChatInput::Empty;
    }
    if !trimmed.starts_with('/') {
        return ChatInput::Send(line.to_string());
    }

    let (command, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (trimmed, ""),
    };
    match command {
        "/quit" | "/exit" => ChatInput::Quit,
        "/refresh" => ChatInput::Refresh,
        "/help" => ChatInput::Help,
        "/delete" if !arg.is_empty() => ChatInput::Delete(MessageId::from(arg)),
        "/delete" => ChatInput::Invalid("usage: /delete <message-id>".to_string()),
        other => ChatInput::Invalid(format!("unknown command `{other}`, try /help")),
    }
}

/// Checks that `id` is in `messages` and was written by `sender_id`.
pub fn check_deletable(messages: &[ChatMessage], id: &MessageId, sender_id: &str) -> Result<(), String> {
    match messages.iter().find(|m| &m.message_id == id) {
        None => Err(format!("no message with id {id}")),
        Some(m) if !is_own(m, sender_id) => Err("you can only delete your own messages".to_string()),
        Some(_) => Ok(()),
    }
}

/// Prints views and status changes to stdout.
struct TerminalPresenter {
    style: RenderStyle,
}

impl Presenter for TerminalPresenter {
    fn render(&self, view: &GroupedView) {
        let mut out = std::io::stdout().lock();
        let _ = write!(out, "\n{}", format_view(view, &self.style));
        let _ = out.flush();
    }

    fn status_changed(&self, status: &ServerStatus) {
        println!("{}", format_status(status, self.style.use_color));
    }

    fn phase_changed(&self, phase: SessionPhase) {
        debug!(%phase, "session phase");
    }
}

/// Leaves the chat by cancelling the shared token.
struct TerminalNavigator {
    cancel: CancellationToken,
    use_color: bool,
}

impl Navigator for TerminalNavigator {
    fn reset_session(&self) {
        let notice = "connection lost, rejoining the room";
        if self.use_color {
            println!("{}", notice.yellow());
        } else {
            println!("{notice}");
        }
    }

    fn go_back(&self) {
        self.cancel.cancel();
    }
}

fn print_help() {
    println!("  <text>            send a message");
    println!("  /delete <id>      delete one of your messages");
    println!("  /refresh          refetch the message list");
    println!("  /quit             leave the room");
}

/// Reads lines on a blocking thread. The channel closes on Ctrl+C, Ctrl+D or
/// a readline failure.
fn spawn_input_thread(prompt: String) -> Result<mpsc::UnboundedReceiver<String>, RelayChatError> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("relaychat-input".to_string())
        .spawn(move || {
            let mut rl = match DefaultEditor::new() {
                Ok(rl) => rl,
                Err(e) => {
                    eprintln!("{}: failed to initialize readline: {e}", "error".red());
                    return;
                }
            };
            loop {
                match rl.readline(&prompt) {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            let _ = rl.add_history_entry(line.as_str());
                        }
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                    Err(e) => {
                        eprintln!("{}: {e}", "error".red());
                        break;
                    }
                }
            }
        })
        .map_err(|e| RelayChatError::Internal(format!("failed to start input thread: {e}")))?;
    Ok(rx)
}

/// Acts on one line. Returns `false` when the user asked to leave.
async fn dispatch(
    input: ChatInput,
    handle: &SessionHandle,
    navigator: &dyn Navigator,
    sender_id: &str,
) -> Result<bool, RelayChatError> {
    match input {
        ChatInput::Send(text) => handle.submit(text).await?,
        ChatInput::Delete(id) => {
            let snapshot = handle.snapshot().await?;
            match check_deletable(&snapshot.messages, &id, sender_id) {
                Ok(()) => handle.delete(id).await?,
                Err(reason) => eprintln!("{reason}"),
            }
        }
        ChatInput::Refresh => handle.refresh().await?,
        ChatInput::Help => print_help(),
        ChatInput::Quit => {
            navigator.go_back();
            return Ok(false);
        }
        ChatInput::Empty => {}
        ChatInput::Invalid(hint) => eprintln!("{hint}"),
    }
    Ok(true)
}

/// Runs the `relaychat chat` interactive session.
pub async fn run_chat(config: RelayChatConfig) -> Result<(), RelayChatError> {
    let cancel = install_signal_handler();
    let settings = SessionSettings::from_config(&config);
    let use_color = std::io::stdout().is_terminal();
    let sender_id = settings.sender_id.clone();

    let source: Arc<dyn MessageSource> = Arc::new(RestRelayClient::from_config(&config.relay)?);
    let transport: Arc<dyn SocketTransport> = Arc::new(WsTransport::from_config(&config.relay));
    let presenter = Arc::new(TerminalPresenter {
        style: RenderStyle {
            offset: day_offset(settings.day_offset_minutes)?,
            own_sender: sender_id.clone(),
            use_color,
        },
    });
    let navigator = Arc::new(TerminalNavigator {
        cancel: cancel.clone(),
        use_color,
    });

    let (session, handle) =
        ChatSession::new(settings, source, transport, presenter, navigator.clone())?;
    let task = session.spawn(cancel.clone());

    if use_color {
        println!("{} {}", config.client.name.bold().green(), config.relay.socket_url.dimmed());
        println!("Type {} for commands.\n", "/help".yellow());
    } else {
        println!("{} {}", config.client.name, config.relay.socket_url);
    }

    let prompt = if use_color {
        format!("{}> ", sender_id.green())
    } else {
        format!("{sender_id}> ")
    };
    let mut lines = spawn_input_thread(prompt)?;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.recv() => {
                let Some(line) = line else {
                    navigator.go_back();
                    break;
                };
                match dispatch(parse_input(&line), &handle, navigator.as_ref(), &sender_id).await {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(e) => {
                        warn!(error = %e, "chat session unavailable");
                        break;
                    }
                }
            }
        }
    }

    // The session may already have stopped on the cancelled token.
    let _ = handle.shutdown().await;
    drain_session(task, SHUTDOWN_TIMEOUT).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(sender: &str, id: &str) -> ChatMessage {
        ChatMessage {
            sender_id: sender.into(),
            message_id: MessageId::from(id),
            message: "x".into(),
            date: "1000".into(),
        }
    }

    #[test]
    fn plain_text_is_sent_untrimmed() {
        assert_eq!(parse_input("  hi there "), ChatInput::Send("  hi there ".into()));
    }

    #[test]
    fn blank_lines_are_empty() {
        assert_eq!(parse_input(""), ChatInput::Empty);
        assert_eq!(parse_input("   \t"), ChatInput::Empty);
    }

    #[test]
    fn commands_are_recognized() {
        assert_eq!(parse_input("/quit"), ChatInput::Quit);
        assert_eq!(parse_input(" /exit "), ChatInput::Quit);
        assert_eq!(parse_input("/refresh"), ChatInput::Refresh);
        assert_eq!(parse_input("/help"), ChatInput::Help);
        assert_eq!(
            parse_input("/delete  MSG-1 "),
            ChatInput::Delete(MessageId::from("MSG-1"))
        );
    }

    #[test]
    fn bad_commands_get_hints() {
        assert!(matches!(parse_input("/delete"), ChatInput::Invalid(h) if h.contains("usage")));
        assert!(matches!(parse_input("/nope"), ChatInput::Invalid(h) if h.contains("/nope")));
    }

    #[test]
    fn only_own_messages_are_deletable() {
        let messages = vec![msg("u1", "MSG-1"), msg("u2", "MSG-2")];
        assert!(check_deletable(&messages, &MessageId::from("MSG-1"), "u1").is_ok());
        assert!(check_deletable(&messages, &MessageId::from("MSG-2"), "u1").is_err());
        assert!(check_deletable(&messages, &MessageId::from("MSG-3"), "u1").is_err());
    }

    #[test]
    fn go_back_cancels_token() {
        let cancel = CancellationToken::new();
        let navigator = TerminalNavigator {
            cancel: cancel.clone(),
            use_color: false,
        };
        navigator.reset_session();
        assert!(!cancel.is_cancelled());
        navigator.go_back();
        assert!(cancel.is_cancelled());
    }
}
