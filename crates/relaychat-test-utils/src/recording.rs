// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Presenter and navigator doubles that record every call.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use relaychat_core::traits::{Navigator, Presenter};
use relaychat_core::types::{GroupedView, ServerStatus, SessionPhase};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Records rendered views, status lines, phases and scroll requests.
#[derive(Default)]
pub struct RecordingPresenter {
    views: Mutex<Vec<GroupedView>>,
    statuses: Mutex<Vec<ServerStatus>>,
    phases: Mutex<Vec<SessionPhase>>,
    scrolls: AtomicUsize,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn views(&self) -> Vec<GroupedView> {
        lock(&self.views).clone()
    }

    /// The most recently rendered view, or an empty one.
    pub fn last_view(&self) -> GroupedView {
        lock(&self.views).last().cloned().unwrap_or_default()
    }

    pub fn statuses(&self) -> Vec<ServerStatus> {
        lock(&self.statuses).clone()
    }

    pub fn last_status(&self) -> Option<ServerStatus> {
        lock(&self.statuses).last().cloned()
    }

    pub fn phases(&self) -> Vec<SessionPhase> {
        lock(&self.phases).clone()
    }

    pub fn scroll_count(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }
}

impl Presenter for RecordingPresenter {
    fn render(&self, view: &GroupedView) {
        lock(&self.views).push(view.clone());
    }

    fn status_changed(&self, status: &ServerStatus) {
        lock(&self.statuses).push(status.clone());
    }

    fn scroll_to_latest(&self) {
        self.scrolls.fetch_add(1, Ordering::SeqCst);
    }

    fn phase_changed(&self, phase: SessionPhase) {
        lock(&self.phases).push(phase);
    }
}

/// Counts navigation requests.
#[derive(Default)]
pub struct RecordingNavigator {
    resets: AtomicUsize,
    backs: AtomicUsize,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    pub fn back_count(&self) -> usize {
        self.backs.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn reset_session(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn go_back(&self) {
        self.backs.fetch_add(1, Ordering::SeqCst);
    }
}
