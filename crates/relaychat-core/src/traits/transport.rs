// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Push channel: socket transports.

use crate::error::RelayChatError;
use crate::socket::{SocketEventSender, SocketHandle};
use crate::traits::adapter::RelayAdapter;

/// Opens sockets to the relay.
///
/// `open` must not block on the handshake: it starts the attempt and returns
/// immediately. Progress is reported through `events` as `Open`, `Frame`,
/// `Error` and finally exactly one `Close`, including when the handshake fails.
pub trait SocketTransport: RelayAdapter {
    fn open(
        &self,
        endpoint: &str,
        events: SocketEventSender,
    ) -> Result<SocketHandle, RelayChatError>;
}
