// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the relaychat configuration system.

use relaychat_config::diagnostic::ConfigError;
use relaychat_config::model::RelayChatConfig;
use relaychat_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn full_toml_deserializes() {
    let toml = r#"
[client]
name = "terminal"
log_level = "debug"

[relay]
base_url = "https://relay.example/"
socket_url = "wss://relay.example/"
request_timeout_secs = 10

[session]
user_id = "u1"
message_id_prefix = "CHT"
reconnect_delay_ms = 1500
day_offset_minutes = 120
scroll_delay_ms = 0
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.client.name, "terminal");
    assert_eq!(config.client.log_level, "debug");
    assert_eq!(config.relay.base_url, "https://relay.example/");
    assert_eq!(config.relay.socket_url, "wss://relay.example/");
    assert_eq!(config.relay.request_timeout_secs, 10);
    assert_eq!(config.session.user_id, "u1");
    assert_eq!(config.session.message_id_prefix, "CHT");
    assert_eq!(config.session.reconnect_delay_ms, 1500);
    assert_eq!(config.session.day_offset_minutes, 120);
    assert_eq!(config.session.scroll_delay_ms, 0);
}

/// An empty document yields the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults should validate");
    let defaults = RelayChatConfig::default();
    assert_eq!(config.session.reconnect_delay_ms, 1000);
    assert_eq!(config.session.message_id_prefix, "MSG");
    assert_eq!(config.session.day_offset_minutes, 0);
    assert_eq!(config.relay.socket_url, defaults.relay.socket_url);
    assert_eq!(config.client.log_level, "info");
}

/// A partial section keeps defaults for the keys it leaves out.
#[test]
fn partial_section_keeps_defaults() {
    let config = load_and_validate_str("[session]\nuser_id = \"bob\"\n").unwrap();
    assert_eq!(config.session.user_id, "bob");
    assert_eq!(config.session.reconnect_delay_ms, 1000);
    assert_eq!(config.session.scroll_delay_ms, 100);
}

/// A typo in a known section produces an UnknownKey error with a suggestion.
#[test]
fn typo_gets_suggestion() {
    let errors = load_and_validate_str("[session]\nusr_id = \"bob\"\n").unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "usr_id");
            assert_eq!(suggestion.as_deref(), Some("user_id"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// An unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[telemetry]\nenabled = true\n").unwrap_err();
    assert!(matches!(&errors[0], ConfigError::UnknownKey { key, .. } if key == "telemetry"));
}

/// A string where a number belongs produces InvalidType.
#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[session]\nreconnect_delay_ms = \"soon\"\n").unwrap_err();
    match &errors[0] {
        ConfigError::InvalidType { key, .. } => assert_eq!(key, "session.reconnect_delay_ms"),
        other => panic!("expected InvalidType, got {other:?}"),
    }
}

/// Values that parse but fail semantic checks surface as Validation errors.
#[test]
fn semantic_validation_runs_after_parse() {
    let errors = load_and_validate_str(
        "[relay]\nsocket_url = \"http://relay.example/\"\n[session]\nreconnect_delay_ms = 0\n",
    )
    .unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|e| matches!(e, ConfigError::Validation { .. })));
}

/// The resolved config serializes back to TOML for `relaychat config`.
#[test]
fn config_serializes_to_toml() {
    let config = RelayChatConfig::default();
    let rendered = toml::to_string_pretty(&config).expect("config should serialize");
    assert!(rendered.contains("[session]"));
    assert!(rendered.contains("reconnect_delay_ms = 1000"));
}
