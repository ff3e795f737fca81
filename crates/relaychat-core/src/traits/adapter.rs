// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait that all relay adapters must implement.

use async_trait::async_trait;

use crate::error::RelayChatError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for relay adapters.
///
/// Provides identity and a health check used by `relaychat status`.
#[async_trait]
pub trait RelayAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Returns the kind of adapter.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a health check and returns the adapter's current status.
    async fn health_check(&self) -> Result<HealthStatus, RelayChatError>;
}
