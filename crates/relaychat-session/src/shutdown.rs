// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shutdown coordination with signal handling.
//!
//! Installs handlers for SIGTERM and SIGINT (Ctrl+C), triggering a
//! [`CancellationToken`] that the chat session monitors.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is
/// received. If a handler cannot be installed the token is still returned and
/// only Ctrl+C (or an explicit cancel) will trigger it.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => {
                            info!("received SIGINT (Ctrl+C), initiating shutdown");
                        }
                        _ = sigterm.recv() => {
                            info!("received SIGTERM, initiating shutdown");
                        }
                        _ = token_clone.cancelled() => {}
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler");
                    tokio::select! {
                        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
                        _ = token_clone.cancelled() => {}
                    }
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                _ = ctrl_c => info!("received Ctrl+C, initiating shutdown"),
                _ = token_clone.cancelled() => {}
            }
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Waits for a session task to finish, giving up after `timeout`.
///
/// Returns `true` if the session stopped in time.
pub async fn drain_session(task: JoinHandle<()>, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(())) => {
            debug!("chat session drained");
            true
        }
        Ok(Err(e)) => {
            warn!(error = %e, "chat session task ended abnormally");
            true
        }
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "chat session did not stop in time");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn install_signal_handler_returns_token() {
        let token = install_signal_handler();
        // Token should not be cancelled yet.
        assert!(!token.is_cancelled());
        // Cancel it manually to clean up the background task.
        token.cancel();
    }

    #[tokio::test]
    async fn drain_finished_task() {
        let task = tokio::spawn(async {});
        assert!(drain_session(task, Duration::from_millis(100)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn drain_gives_up_on_stuck_task() {
        let task = tokio::spawn(std::future::pending::<()>());
        assert!(!drain_session(task, Duration::from_millis(100)).await);
    }
}
