// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The chat session: one task that owns the store and the socket.
//!
//! The session loop is the only writer of the message store and of the
//! connection state. REST calls and socket I/O run in their own tasks and
//! report back to the loop, which handles everything in arrival order.
//!
//! Phases run `idle -> fetching -> connecting -> live`, and a socket close
//! moves to `reconnecting`. When the reconnect timer fires the whole session
//! resets in place: the store is cleared, the epoch advances and the fetch
//! and connect of a cold start are repeated. REST results carry the epoch
//! they were issued in and are dropped if it has moved on.

use std::sync::Arc;
use std::time::Duration;

use chrono::FixedOffset;
use relaychat_config::RelayChatConfig;
use relaychat_core::{
    ChatMessage, ConnectionState, GroupedView, MessageId, MessageSource, Navigator, Presenter,
    RelayChatError, ServerStatus, SessionPhase, SocketEvent, SocketTransport,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::connection::{ConnectionManager, ConnectionUpdate};
use crate::grouping::{day_offset, group_by_day};
use crate::store::MessageStore;
use crate::submitter::{self, OutboundSubmitter};

/// Capacity of the command channel behind [`SessionHandle`].
const COMMAND_BUFFER: usize = 64;

/// Everything a session needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub sender_id: String,
    pub message_id_prefix: String,
    pub socket_url: String,
    pub reconnect_delay: Duration,
    pub scroll_delay: Duration,
    pub day_offset_minutes: i32,
}

impl SessionSettings {
    pub fn from_config(config: &RelayChatConfig) -> Self {
        Self {
            sender_id: config.session.user_id.clone(),
            message_id_prefix: config.session.message_id_prefix.clone(),
            socket_url: config.relay.socket_url.clone(),
            reconnect_delay: config.session.reconnect_delay(),
            scroll_delay: config.session.scroll_delay(),
            day_offset_minutes: config.session.day_offset_minutes,
        }
    }
}

/// Point-in-time copy of the session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub connection: ConnectionState,
    pub status: ServerStatus,
    pub messages: Vec<ChatMessage>,
    pub view: GroupedView,
    pub input_empty: bool,
    pub epoch: u64,
}

/// Requests sent to a running session.
#[derive(Debug)]
pub enum SessionCommand {
    Submit(String),
    Delete(MessageId),
    Refresh,
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

/// Cloneable handle for talking to a running [`ChatSession`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    async fn send(&self, command: SessionCommand) -> Result<(), RelayChatError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| RelayChatError::Internal("chat session has stopped".to_string()))
    }

    /// Sends `text` as a new message. Empty or whitespace-only text is ignored.
    pub async fn submit(&self, text: impl Into<String>) -> Result<(), RelayChatError> {
        self.send(SessionCommand::Submit(text.into())).await
    }

    /// Deletes a message on the relay, then refetches.
    pub async fn delete(&self, id: impl Into<MessageId>) -> Result<(), RelayChatError> {
        self.send(SessionCommand::Delete(id.into())).await
    }

    /// Re-issues the REST fetch.
    pub async fn refresh(&self) -> Result<(), RelayChatError> {
        self.send(SessionCommand::Refresh).await
    }

    /// Reads the current session state.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, RelayChatError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Snapshot(reply)).await?;
        rx.await
            .map_err(|_| RelayChatError::Internal("chat session has stopped".to_string()))
    }

    /// Stops the session. The socket is torn down without a reconnect.
    pub async fn shutdown(&self) -> Result<(), RelayChatError> {
        self.send(SessionCommand::Shutdown).await
    }
}

/// Results reported back by spawned REST tasks.
#[derive(Debug)]
enum TaskResult {
    Fetched {
        epoch: u64,
        result: Result<Vec<ChatMessage>, RelayChatError>,
    },
    Deleted {
        epoch: u64,
        id: MessageId,
        result: Result<(), RelayChatError>,
    },
}

/// Screen-level state machine tying the REST source, the socket, the store
/// and the presentation together.
pub struct ChatSession {
    id: Uuid,
    settings: SessionSettings,
    offset: FixedOffset,
    source: Arc<dyn MessageSource>,
    presenter: Arc<dyn Presenter>,
    navigator: Arc<dyn Navigator>,
    connection: ConnectionManager,
    socket_events: mpsc::UnboundedReceiver<SocketEvent>,
    commands: mpsc::Receiver<SessionCommand>,
    tasks: JoinSet<TaskResult>,
    store: MessageStore,
    view: GroupedView,
    submitter: OutboundSubmitter,
    phase: SessionPhase,
    status: ServerStatus,
    epoch: u64,
    scroll_at: Option<Instant>,
}

impl ChatSession {
    /// Builds an idle session and the handle used to drive it.
    pub fn new(
        settings: SessionSettings,
        source: Arc<dyn MessageSource>,
        transport: Arc<dyn SocketTransport>,
        presenter: Arc<dyn Presenter>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<(Self, SessionHandle), RelayChatError> {
        let offset = day_offset(settings.day_offset_minutes)?;
        let (connection, socket_events) = ConnectionManager::new(
            transport,
            settings.socket_url.clone(),
            settings.reconnect_delay,
        );
        let (tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let submitter =
            OutboundSubmitter::new(settings.sender_id.clone(), settings.message_id_prefix.clone());

        let session = Self {
            id: Uuid::new_v4(),
            settings,
            offset,
            source,
            presenter,
            navigator,
            connection,
            socket_events,
            commands,
            tasks: JoinSet::new(),
            store: MessageStore::new(),
            view: GroupedView::default(),
            submitter,
            phase: SessionPhase::Idle,
            status: ServerStatus::Loading,
            epoch: 0,
            scroll_at: None,
        };
        Ok((session, SessionHandle { tx }))
    }

    /// Runs the session on its own task until cancelled or shut down.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    /// Runs the session loop until `cancel` fires, a `Shutdown` command
    /// arrives or every handle is dropped.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(session_id = %self.id, sender_id = %self.settings.sender_id, "chat session starting");
        self.presenter.status_changed(&self.status);
        self.start();

        loop {
            let reconnect_at = self.connection.reconnect_deadline();
            let scroll_at = self.scroll_at;

            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    info!(session_id = %self.id, "cancellation requested");
                    break;
                }
                Some(event) = self.socket_events.recv() => {
                    self.on_socket_event(event);
                }
                Some(joined) = self.tasks.join_next() => match joined {
                    Ok(result) => self.on_task_result(result),
                    Err(e) => warn!(session_id = %self.id, error = %e, "background request failed to complete"),
                },
                _ = tokio::time::sleep_until(reconnect_at.unwrap_or_else(Instant::now)), if reconnect_at.is_some() => {
                    self.on_reconnect_due();
                }
                _ = tokio::time::sleep_until(scroll_at.unwrap_or_else(Instant::now)), if scroll_at.is_some() => {
                    self.scroll_at = None;
                    self.presenter.scroll_to_latest();
                }
                command = self.commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.on_command(command),
                },
            }
        }

        self.stop();
    }

    /// Cold start for the current epoch: fetch and connect concurrently.
    fn start(&mut self) {
        self.set_phase(SessionPhase::Fetching);
        self.spawn_fetch();
        self.set_phase(SessionPhase::Connecting);
        if let Err(e) = self.connection.connect() {
            warn!(session_id = %self.id, error = %e, "could not start socket, retrying");
            self.set_phase(SessionPhase::Reconnecting);
            self.set_status(ServerStatus::Disconnected);
        }
    }

    fn on_reconnect_due(&mut self) {
        self.connection.clear_reconnect();
        self.epoch += 1;
        info!(session_id = %self.id, epoch = self.epoch, "resetting session");
        self.store.clear();
        self.scroll_at = None;
        self.refresh_view();
        self.set_status(ServerStatus::Loading);
        self.start();
    }

    fn on_socket_event(&mut self, event: SocketEvent) {
        let update = match self.connection.handle_event(event) {
            Ok(update) => update,
            // Malformed frames are logged by the connection manager and dropped.
            Err(_) => return,
        };

        match update {
            ConnectionUpdate::Ignored => {}
            ConnectionUpdate::Opened => {
                self.set_phase(SessionPhase::Live);
                self.set_status(ServerStatus::Connected);
            }
            ConnectionUpdate::Snapshot(messages) => self.apply_snapshot(messages),
            ConnectionUpdate::Errored(_) => {
                self.set_phase(SessionPhase::Reconnecting);
                self.set_status(ServerStatus::SocketError);
            }
            ConnectionUpdate::Closed { reconnect_scheduled } => {
                self.set_phase(SessionPhase::Reconnecting);
                self.set_status(ServerStatus::Disconnected);
                if reconnect_scheduled {
                    self.navigator.reset_session();
                }
            }
        }
    }

    fn on_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Fetched { epoch, result } => {
                if epoch != self.epoch {
                    debug!(session_id = %self.id, epoch, current = self.epoch, "dropping stale fetch result");
                    return;
                }
                match result {
                    Ok(messages) => {
                        debug!(session_id = %self.id, count = messages.len(), "fetch completed");
                        self.apply_snapshot(messages);
                    }
                    Err(e) => {
                        warn!(session_id = %self.id, error = %e, "fetch failed");
                        self.set_status(ServerStatus::RequestFailed(e.to_string()));
                    }
                }
            }
            TaskResult::Deleted { epoch, id, result } => {
                if epoch != self.epoch {
                    debug!(session_id = %self.id, message_id = %id, "dropping stale delete result");
                    return;
                }
                match result {
                    Ok(()) => {
                        if self.store.remove_by_id(&id) {
                            self.refresh_view();
                        }
                        self.spawn_fetch();
                    }
                    Err(e) => {
                        warn!(session_id = %self.id, message_id = %id, error = %e, "delete failed");
                        self.set_status(ServerStatus::RequestFailed(e.to_string()));
                    }
                }
            }
        }
    }

    fn on_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Submit(text) => {
                match self.submitter.submit_message(text, &self.connection) {
                    Ok(Some(message)) => {
                        debug!(session_id = %self.id, message_id = %message.message_id, "submitted");
                    }
                    Ok(None) => {}
                    Err(e) => warn!(session_id = %self.id, error = %e, "message not sent"),
                }
            }
            SessionCommand::Delete(id) => self.spawn_delete(id),
            SessionCommand::Refresh => self.spawn_fetch(),
            SessionCommand::Snapshot(reply) => {
                // The caller may have given up waiting.
                let _ = reply.send(self.snapshot());
            }
            // Handled by the loop.
            SessionCommand::Shutdown => {}
        }
    }

    fn spawn_fetch(&mut self) {
        let source = Arc::clone(&self.source);
        let epoch = self.epoch;
        self.tasks.spawn(async move {
            let result = source.fetch_messages().await;
            TaskResult::Fetched { epoch, result }
        });
    }

    fn spawn_delete(&mut self, id: MessageId) {
        let source = Arc::clone(&self.source);
        let epoch = self.epoch;
        self.tasks.spawn(async move {
            let result = submitter::delete_message(source.as_ref(), &id).await;
            TaskResult::Deleted { epoch, id, result }
        });
    }

    fn apply_snapshot(&mut self, messages: Vec<ChatMessage>) {
        self.store.replace(messages);
        self.refresh_view();
        self.schedule_scroll();
    }

    fn refresh_view(&mut self) {
        self.view = group_by_day(self.store.messages(), self.offset);
        self.presenter.render(&self.view);
    }

    fn schedule_scroll(&mut self) {
        if self.settings.scroll_delay.is_zero() {
            self.presenter.scroll_to_latest();
        } else {
            self.scroll_at = Some(Instant::now() + self.settings.scroll_delay);
        }
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        if self.phase != phase {
            debug!(session_id = %self.id, from = %self.phase, to = %phase, "phase change");
            self.phase = phase;
            self.presenter.phase_changed(phase);
        }
    }

    fn set_status(&mut self, status: ServerStatus) {
        if self.status != status {
            self.status = status;
            self.presenter.status_changed(&self.status);
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            connection: self.connection.state(),
            status: self.status.clone(),
            messages: self.store.messages().to_vec(),
            view: self.view.clone(),
            input_empty: self.submitter.input_empty(),
            epoch: self.epoch,
        }
    }

    fn stop(&mut self) {
        self.connection.disconnect();
        self.tasks.abort_all();
        self.set_phase(SessionPhase::Idle);
        info!(session_id = %self.id, epoch = self.epoch, "chat session stopped");
    }
}
