// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./relaychat.toml` > `~/.config/relaychat/relaychat.toml` >
//! `/etc/relaychat/relaychat.toml` with environment variable overrides via `RELAYCHAT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RelayChatConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/relaychat/relaychat.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "relaychat.toml";

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("relaychat").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/relaychat/relaychat.toml` (system-wide)
/// 3. `~/.config/relaychat/relaychat.toml` (user XDG config)
/// 4. `./relaychat.toml` (local directory)
/// 5. `RELAYCHAT_*` environment variables
pub fn load_config() -> Result<RelayChatConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<RelayChatConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayChatConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RelayChatConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RelayChatConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RelayChatConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider mapping `RELAYCHAT_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Uses `Env::map()` rather than `Env::split("_")`: `RELAYCHAT_SESSION_USER_ID`
/// must map to `session.user_id`, not `session.user.id`.
fn env_provider() -> Env {
    Env::prefixed("RELAYCHAT_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("client_", "client.", 1)
            .replacen("relay_", "relay.", 1)
            .replacen("session_", "session.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_nested_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("RELAYCHAT_SESSION_USER_ID", "alice");
            jail.set_env("RELAYCHAT_SESSION_RECONNECT_DELAY_MS", "2500");
            jail.set_env("RELAYCHAT_RELAY_SOCKET_URL", "wss://relay.example/");

            let config = load_config()?;
            assert_eq!(config.session.user_id, "alice");
            assert_eq!(config.session.reconnect_delay_ms, 2500);
            assert_eq!(config.relay.socket_url, "wss://relay.example/");
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_FILE,
                r#"
                [session]
                message_id_prefix = "CHT"
                "#,
            )?;

            let config = load_config()?;
            assert_eq!(config.session.message_id_prefix, "CHT");
            assert_eq!(config.session.reconnect_delay_ms, 1000);
            Ok(())
        });
    }

    #[test]
    fn env_wins_over_local_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_FILE,
                r#"
                [client]
                log_level = "warn"
                "#,
            )?;
            jail.set_env("RELAYCHAT_CLIENT_LOG_LEVEL", "debug");

            let config = load_config()?;
            assert_eq!(config.client.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn explicit_path_is_loaded() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                [relay]
                request_timeout_secs = 5
                "#,
            )?;

            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.relay.request_timeout_secs, 5);
            Ok(())
        });
    }
}
