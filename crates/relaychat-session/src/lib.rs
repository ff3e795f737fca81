// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat session synchronizer.
//!
//! Keeps a local snapshot of a shared chat room in step with the relay:
//! an initial REST fetch, a WebSocket that pushes full snapshots, sends over
//! that socket, deletes over REST, and a fixed-delay reconnect that resets
//! the session after every close.

pub mod connection;
pub mod grouping;
pub mod ids;
pub mod session;
pub mod shutdown;
pub mod store;
pub mod submitter;

pub use connection::{ConnectionManager, ConnectionUpdate};
pub use grouping::{day_label, day_offset, group_by_day, time_label, INVALID_DATE_LABEL};
pub use ids::MessageIdGenerator;
pub use session::{ChatSession, SessionCommand, SessionHandle, SessionSettings, SessionSnapshot};
pub use shutdown::{drain_session, install_signal_handler};
pub use store::MessageStore;
pub use submitter::{delete_message, is_own, OutboundSubmitter};
