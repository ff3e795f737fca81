// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use url::Url;

use crate::diagnostic::ConfigError;
use crate::model::RelayChatConfig;

/// Largest accepted day-grouping offset, one minute short of a full day.
pub const MAX_DAY_OFFSET_MINUTES: i32 = 23 * 60 + 59;

/// Validate a deserialized configuration.
///
/// Collects every problem instead of failing fast.
pub fn validate_config(config: &RelayChatConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    check_url(
        &mut errors,
        "relay.base_url",
        &config.relay.base_url,
        &["http", "https"],
    );
    check_url(
        &mut errors,
        "relay.socket_url",
        &config.relay.socket_url,
        &["ws", "wss"],
    );

    if config.relay.request_timeout_secs == 0 {
        errors.push(invalid("relay.request_timeout_secs must be greater than 0"));
    }

    if config.session.user_id.trim().is_empty() {
        errors.push(invalid("session.user_id must not be empty"));
    }

    if config.session.message_id_prefix.chars().any(char::is_whitespace) {
        errors.push(invalid(format!(
            "session.message_id_prefix `{}` must not contain whitespace",
            config.session.message_id_prefix
        )));
    }

    if config.session.reconnect_delay_ms == 0 {
        errors.push(invalid("session.reconnect_delay_ms must be greater than 0"));
    }

    let offset = config.session.day_offset_minutes;
    if !(-MAX_DAY_OFFSET_MINUTES..=MAX_DAY_OFFSET_MINUTES).contains(&offset) {
        errors.push(invalid(format!(
            "session.day_offset_minutes must be within ±{MAX_DAY_OFFSET_MINUTES}, got {offset}"
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ConfigError>, key: &str, value: &str, schemes: &[&str]) {
    match Url::parse(value.trim()) {
        Ok(url) if schemes.contains(&url.scheme()) => {}
        Ok(url) => errors.push(invalid(format!(
            "{key} `{value}` uses scheme `{}`, expected one of: {}",
            url.scheme(),
            schemes.join(", ")
        ))),
        Err(e) => errors.push(invalid(format!("{key} `{value}` is not a valid URL: {e}"))),
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(errors: &[ConfigError]) -> Vec<String> {
        errors.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&RelayChatConfig::default()).is_ok());
    }

    #[test]
    fn socket_url_must_be_websocket() {
        let mut config = RelayChatConfig::default();
        config.relay.socket_url = "https://relay.example/".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(messages(&errors)[0].contains("relay.socket_url"));
        assert!(messages(&errors)[0].contains("ws, wss"));
    }

    #[test]
    fn base_url_must_parse() {
        let mut config = RelayChatConfig::default();
        config.relay.base_url = "not a url".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(messages(&errors)[0].contains("not a valid URL"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = RelayChatConfig::default();
        config.session.reconnect_delay_ms = 0;
        config.session.user_id = "  ".into();
        config.session.day_offset_minutes = 24 * 60;
        config.relay.request_timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn offset_bounds_are_inclusive() {
        let mut config = RelayChatConfig::default();
        config.session.day_offset_minutes = -MAX_DAY_OFFSET_MINUTES;
        assert!(validate_config(&config).is_ok());
        config.session.day_offset_minutes = MAX_DAY_OFFSET_MINUTES + 1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn extreme_offsets_are_reported() {
        let mut config = RelayChatConfig::default();
        for minutes in [i32::MIN, i32::MAX] {
            config.session.day_offset_minutes = minutes;
            let errors = validate_config(&config).unwrap_err();
            assert_eq!(errors.len(), 1);
            assert!(messages(&errors)[0].contains("day_offset_minutes"));
        }
    }

    #[test]
    fn prefix_rejects_whitespace() {
        let mut config = RelayChatConfig::default();
        config.session.message_id_prefix = "M SG".into();
        assert!(validate_config(&config).is_err());
    }
}
