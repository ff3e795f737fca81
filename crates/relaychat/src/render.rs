// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text rendering of grouped message views.

use std::borrow::Cow;

use chrono::FixedOffset;
use colored::Colorize;
use relaychat_core::{ChatMessage, GroupedView, ServerStatus};
use relaychat_session::{is_own, time_label};

/// Rendering options shared by `chat` and `history`.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub offset: FixedOffset,
    pub own_sender: String,
    pub use_color: bool,
}

/// Escapes control characters in relay-supplied text so a peer cannot drive
/// the terminal. Tabs pass through.
pub fn printable(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|c| c.is_control() && c != '\t') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() && c != '\t' {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn format_message(message: &ChatMessage, style: &RenderStyle) -> String {
    let time = time_label(message, style.offset).unwrap_or_else(|| "--:--".to_string());
    let own = is_own(message, &style.own_sender);
    let sender = if own { Cow::Borrowed("you") } else { printable(&message.sender_id) };
    let body = printable(&message.message);
    let id = printable(message.message_id.as_str());

    if style.use_color {
        let sender = if own { sender.cyan().bold() } else { sender.yellow() };
        format!(
            "  {} {}: {} {}",
            time.dimmed(),
            sender,
            body,
            format!("[{id}]").dimmed()
        )
    } else {
        format!("  {time} {sender}: {body} [{id}]")
    }
}

/// Formats a view as day headers followed by one line per message.
pub fn format_view(view: &GroupedView, style: &RenderStyle) -> String {
    if view.is_empty() {
        return "  (no messages)\n".to_string();
    }

    let mut out = String::new();
    for group in &view.groups {
        let header = format!("-- {} --", group.label);
        if style.use_color {
            out.push_str(&format!("{}\n", header.bold()));
        } else {
            out.push_str(&header);
            out.push('\n');
        }
        for message in &group.messages {
            out.push_str(&format_message(message, style));
            out.push('\n');
        }
    }
    out
}

/// One-line status for the status bar.
pub fn format_status(status: &ServerStatus, use_color: bool) -> String {
    let raw = status.to_string();
    let text = printable(&raw);
    if !use_color {
        return format!("[{text}]");
    }
    if status.is_problem() {
        format!("[{}]", text.red())
    } else {
        format!("[{}]", text.green())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaychat_core::{DayGroup, MessageId};

    fn style() -> RenderStyle {
        RenderStyle {
            offset: FixedOffset::east_opt(0).unwrap(),
            own_sender: "u1".into(),
            use_color: false,
        }
    }

    fn msg(sender: &str, id: &str, text: &str, date: &str) -> ChatMessage {
        ChatMessage {
            sender_id: sender.into(),
            message_id: MessageId::from(id),
            message: text.into(),
            date: date.into(),
        }
    }

    #[test]
    fn plain_view_has_headers_and_lines() {
        let view = GroupedView {
            groups: vec![DayGroup {
                label: "Thursday 01/01/1970".into(),
                messages: vec![
                    msg("u1", "MSG-1", "hello", "60000"),
                    msg("u2", "MSG-2", "hi", "120000"),
                ],
            }],
        };
        let text = format_view(&view, &style());
        assert_eq!(
            text,
            "-- Thursday 01/01/1970 --\n  00:01 you: hello [MSG-1]\n  00:02 u2: hi [MSG-2]\n"
        );
    }

    #[test]
    fn invalid_date_shows_placeholder_time() {
        let view = GroupedView {
            groups: vec![DayGroup {
                label: "Invalid date".into(),
                messages: vec![msg("u2", "MSG-3", "??", "soon")],
            }],
        };
        assert!(format_view(&view, &style()).contains("--:-- u2: ?? [MSG-3]"));
    }

    #[test]
    fn control_sequences_in_remote_text_are_escaped() {
        let view = GroupedView {
            groups: vec![DayGroup {
                label: "Thursday 01/01/1970".into(),
                messages: vec![msg("u2\x1b]0;owned\x07", "MSG-4", "\x1b[2Jgone\ttab", "60000")],
            }],
        };
        let text = format_view(&view, &style());
        assert!(!text.contains('\x1b'));
        assert!(!text.contains('\x07'));
        assert!(text.contains("u2\\u{1b}]0;owned\\u{7}: \\u{1b}[2Jgone\ttab [MSG-4]"));
    }

    #[test]
    fn printable_borrows_clean_text() {
        assert!(matches!(printable("hello there"), Cow::Borrowed("hello there")));
        assert_eq!(printable("a\nb"), "a\\nb");
    }

    #[test]
    fn empty_view_placeholder() {
        assert_eq!(format_view(&GroupedView::default(), &style()), "  (no messages)\n");
    }

    #[test]
    fn plain_status() {
        assert_eq!(format_status(&ServerStatus::Connected, false), "[Connected]");
        assert_eq!(
            format_status(&ServerStatus::SocketError, false),
            "[WebSocket error occurred.]"
        );
    }
}
