// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! relaychat - terminal client for a realtime relay chat room.
//!
//! This is the binary entry point.

mod chat;
mod history;
mod render;
mod status;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use relaychat_config::RelayChatConfig;
use relaychat_core::RelayChatError;

/// relaychat - terminal client for a realtime relay chat room.
#[derive(Parser, Debug)]
#[command(name = "relaychat", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the usual locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Join the chat room interactively.
    Chat,
    /// Fetch the message list once and print it grouped by day.
    History {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Delete one message by id.
    Delete {
        /// Message id, e.g. MSG-1700000-aZ09xy-000123.
        id: String,
    },
    /// Check that the relay's REST and socket endpoints respond.
    Status {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn load_config(path: Option<&PathBuf>) -> Result<RelayChatConfig, Vec<relaychat_config::ConfigError>> {
    match path {
        Some(path) => relaychat_config::load_and_validate_path(path),
        None => relaychat_config::load_and_validate(),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("relaychat={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

fn print_config(config: &RelayChatConfig) -> Result<(), RelayChatError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| RelayChatError::Internal(format!("failed to serialize config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            relaychat_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.client.log_level);

    let result = match cli.command {
        Some(Commands::Chat) => chat::run_chat(config).await,
        Some(Commands::History { plain }) => history::run_history(&config, plain).await,
        Some(Commands::Delete { id }) => history::run_delete(&config, &id).await,
        Some(Commands::Status { json, plain }) => status::run_status(&config, json, plain).await,
        Some(Commands::Config) => print_config(&config),
        None => {
            println!("relaychat: use --help for available commands");
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("relaychat: {e}");
            ExitCode::FAILURE
        }
    }
}
