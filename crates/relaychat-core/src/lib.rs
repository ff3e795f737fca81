// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the relaychat client.
//!
//! This crate provides the wire types, error type, socket event plumbing and
//! adapter traits shared by the session engine, the relay adapters and the
//! test utilities.

pub mod error;
pub mod socket;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::RelayChatError;
pub use socket::{SocketEvent, SocketEventKind, SocketEventSender, SocketHandle};
pub use types::{
    AdapterType, ChatMessage, ConnectionState, DayGroup, GroupedView, HealthStatus, MessageId,
    ServerStatus, SessionPhase,
};

pub use traits::{MessageSource, Navigator, Presenter, RelayAdapter, SocketTransport};

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: &str, date: &str) -> ChatMessage {
        ChatMessage {
            sender_id: "u1".into(),
            message_id: MessageId::from(id),
            message: "hi".into(),
            date: date.into(),
        }
    }

    #[test]
    fn chat_message_uses_camel_case_wire_names() {
        let m = msg("MSG-1", "1000");
        let json = serde_json::to_value(&m).expect("should serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "senderId": "u1",
                "messageId": "MSG-1",
                "message": "hi",
                "date": "1000"
            })
        );
    }

    #[test]
    fn snapshot_frame_deserializes() {
        let frame = r#"[{"senderId":"u1","messageId":"MSG-1","message":"hi","date":"1000"},
                        {"senderId":"u2","messageId":"MSG-2","message":"yo","date":"1001"}]"#;
        let parsed: Vec<ChatMessage> = serde_json::from_str(frame).expect("should parse");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].message_id.as_str(), "MSG-2");
        assert_eq!(parsed[1].sender_id, "u2");
    }

    #[test]
    fn numeric_date_is_rejected() {
        let frame = r#"[{"senderId":"u1","messageId":"MSG-1","message":"hi","date":1000}]"#;
        assert!(serde_json::from_str::<Vec<ChatMessage>>(frame).is_err());
    }

    #[test]
    fn timestamp_parsing() {
        assert_eq!(msg("a", "1000").timestamp_millis(), Some(1000));
        assert_eq!(msg("a", "").timestamp_millis(), Some(0));
        assert_eq!(msg("a", " 42 ").timestamp_millis(), Some(42));
        assert_eq!(msg("a", "1000.9").timestamp_millis(), Some(1000));
        assert_eq!(msg("a", "not-a-date").timestamp_millis(), None);
        assert_eq!(msg("a", "NaN").timestamp_millis(), None);
    }

    #[test]
    fn chat_message_new_stamps_date() {
        let m = ChatMessage::new("u1", MessageId::from("MSG-1"), "hey", 1_700_000_000_000);
        assert_eq!(m.date, "1700000000000");
        assert_eq!(m.timestamp_millis(), Some(1_700_000_000_000));
    }

    #[test]
    fn connection_state_display_round_trip() {
        use std::str::FromStr;

        for state in [
            ConnectionState::Connecting,
            ConnectionState::Open,
            ConnectionState::Closed,
            ConnectionState::Error,
        ] {
            let s = state.to_string();
            assert_eq!(ConnectionState::from_str(&s).unwrap(), state);
        }
        assert_eq!(ConnectionState::Open.to_string(), "open");
        assert!(ConnectionState::Connecting.is_active());
        assert!(!ConnectionState::Error.is_active());
    }

    #[test]
    fn session_phase_display() {
        assert_eq!(SessionPhase::Reconnecting.to_string(), "reconnecting");
        assert_eq!(SessionPhase::Idle.to_string(), "idle");
    }

    #[test]
    fn server_status_strings() {
        assert_eq!(ServerStatus::Loading.to_string(), "Loading...");
        assert_eq!(ServerStatus::Connected.to_string(), "Connected");
        assert_eq!(
            ServerStatus::Disconnected.to_string(),
            "Disconnected. Check internet or server!"
        );
        assert_eq!(
            ServerStatus::SocketError.to_string(),
            "WebSocket error occurred."
        );
        assert_eq!(
            ServerStatus::RequestFailed("503".into()).to_string(),
            "Request failed: 503"
        );
        assert!(ServerStatus::Disconnected.is_problem());
        assert!(!ServerStatus::Connected.is_problem());
    }

    #[test]
    fn grouped_view_helpers() {
        let view = GroupedView {
            groups: vec![
                DayGroup {
                    label: "Thursday 01/01/1970".into(),
                    messages: vec![msg("MSG-1", "1000"), msg("MSG-2", "1001")],
                },
                DayGroup {
                    label: "Friday 02/01/1970".into(),
                    messages: vec![msg("MSG-3", "86400000")],
                },
            ],
        };
        assert_eq!(view.message_count(), 3);
        assert_eq!(view.latest().unwrap().message_id.as_str(), "MSG-3");
        assert!(view.group("Friday 02/01/1970").is_some());
        assert!(view.group("Saturday 03/01/1970").is_none());
        assert!(GroupedView::default().latest().is_none());
    }

    #[test]
    fn error_messages() {
        let err = RelayChatError::SubmissionDropped {
            state: ConnectionState::Closed,
        };
        assert_eq!(err.to_string(), "submission dropped: socket is closed");

        let err = RelayChatError::fetch("GET / returned 500");
        assert_eq!(err.to_string(), "fetch error: GET / returned 500");

        let parse_err = serde_json::from_str::<Vec<ChatMessage>>("nope").unwrap_err();
        let err = RelayChatError::MalformedFrame { source: parse_err };
        assert!(err.to_string().starts_with("malformed frame:"));
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_message_source<T: MessageSource>() {}
        fn _assert_socket_transport<T: SocketTransport>() {}
        fn _assert_presenter<T: Presenter>() {}
        fn _assert_navigator<T: Navigator>() {}
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn integer_dates_parse_exactly(ms in -8_640_000_000_000i64..8_640_000_000_000i64) {
                let m = msg("MSG-1", &ms.to_string());
                prop_assert_eq!(m.timestamp_millis(), Some(ms));
            }
        }
    }
}
