// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter and collaborator traits for the relaychat client.
//!
//! Relay adapters extend the [`RelayAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility. Presentation and
//! navigation are injected as plain synchronous traits.

pub mod adapter;
pub mod observer;
pub mod source;
pub mod transport;

pub use adapter::RelayAdapter;
pub use observer::{Navigator, Presenter};
pub use source::MessageSource;
pub use transport::SocketTransport;
