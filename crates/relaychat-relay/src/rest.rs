// SPDX-FileCopyrightText: 2026 Relaychat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the relay's REST side.
//!
//! `GET <base>/` returns the full message list and `DELETE <base>/<id>`
//! removes one message. Any 2xx counts as success; the delete body is
//! ignored.

use std::time::Duration;

use async_trait::async_trait;
use relaychat_config::model::RelayConfig;
use relaychat_core::{
    AdapterType, ChatMessage, HealthStatus, MessageId, MessageSource, RelayAdapter,
    RelayChatError,
};
use tracing::debug;
use url::Url;

/// Parses a REST base URL and makes sure its path ends in `/`.
pub fn parse_base_url(base_url: &str) -> Result<Url, RelayChatError> {
    let mut url = Url::parse(base_url).map_err(|e| RelayChatError::InvalidEndpoint {
        endpoint: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(RelayChatError::InvalidEndpoint {
            endpoint: base_url.to_string(),
            reason: format!("expected http or https, got {}", url.scheme()),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn request_error(action: &str, e: reqwest::Error) -> RelayChatError {
    RelayChatError::Fetch {
        message: format!("{action} failed: {e}"),
        source: Some(Box::new(e)),
    }
}

/// REST adapter implementing [`MessageSource`].
#[derive(Debug, Clone)]
pub struct RestRelayClient {
    client: reqwest::Client,
    base_url: Url,
}

impl RestRelayClient {
    /// Creates a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RelayChatError> {
        let base_url = parse_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RelayChatError::Fetch {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self, RelayChatError> {
        Self::new(&config.base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/<id>`, with the id percent-encoded as a single path segment.
    pub fn message_url(&self, id: &MessageId) -> Result<Url, RelayChatError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RelayChatError::InvalidEndpoint {
                endpoint: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }
}

#[async_trait]
impl RelayAdapter for RestRelayClient {
    fn name(&self) -> &str {
        "rest"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::MessageSource
    }

    async fn health_check(&self) -> Result<HealthStatus, RelayChatError> {
        match self.client.get(self.base_url.clone()).send().await {
            Ok(response) if response.status().is_success() => Ok(HealthStatus::Healthy),
            Ok(response) => Ok(HealthStatus::Degraded(format!(
                "GET {} returned {}",
                self.base_url,
                response.status()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }
}

#[async_trait]
impl MessageSource for RestRelayClient {
    async fn fetch_messages(&self) -> Result<Vec<ChatMessage>, RelayChatError> {
        let response = self
            .client
            .get(self.base_url.clone())
            .send()
            .await
            .map_err(|e| request_error("GET", e))?;

        let status = response.status();
        debug!(status = %status, url = %self.base_url, "fetch response received");
        if !status.is_success() {
            return Err(RelayChatError::fetch(format!("GET {} returned {status}", self.base_url)));
        }

        response
            .json::<Vec<ChatMessage>>()
            .await
            .map_err(|e| request_error("decoding message list", e))
    }

    async fn delete_message(&self, id: &MessageId) -> Result<(), RelayChatError> {
        let url = self.message_url(id)?;
        let response = self
            .client
            .delete(url.clone())
            .send()
            .await
            .map_err(|e| request_error("DELETE", e))?;

        let status = response.status();
        debug!(status = %status, %url, "delete response received");
        if !status.is_success() {
            return Err(RelayChatError::fetch(format!("DELETE {url} returned {status}")));
        }
        Ok(())
    }
}
