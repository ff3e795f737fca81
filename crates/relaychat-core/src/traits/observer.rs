// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborators the chat session reports to.

use crate::types::{GroupedView, ServerStatus, SessionPhase};

/// Presentation layer.
pub trait Presenter: Send + Sync {
    /// Called with a freshly derived view whenever the message store changes.
    fn render(&self, view: &GroupedView);

    /// Called when the status line changes.
    fn status_changed(&self, _status: &ServerStatus) {}

    /// Asks the presenter to bring the newest message into view.
    fn scroll_to_latest(&self) {}

    /// Called on every session phase transition.
    fn phase_changed(&self, _phase: SessionPhase) {}
}

/// Navigation controller.
pub trait Navigator: Send + Sync {
    /// Reset the chat screen as if it were entered cold. Invoked once per socket close.
    fn reset_session(&self);

    /// Leave the chat screen.
    fn go_back(&self) {}
}
