use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::directory::ChannelRecord;
use crate::server::utils::header_utils::HeaderSet;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory unreachable: {0}")]
    Unreachable(String),
    #[error("directory returned status {0}")]
    Status(StatusCode),
    #[error("malformed directory payload: {0}")]
    MalformedUpstreamPayload(String),
}

pub type DynDirectorySource = Arc<dyn DirectorySource + Send + Sync>;

/// where the channel list comes from, the cache in front of this never surfaces these errors
#[automock]
#[async_trait]
pub trait DirectorySource {
    /// every channel the directory knows about, unfiltered
    async fn fetch_channels(&self) -> Result<Vec<ChannelRecord>, DirectoryError>;
}

pub struct HttpDirectorySource {
    http: reqwest::Client,
    url: String,
    headers: HeaderSet,
    timeout: Duration,
}

impl HttpDirectorySource {
    pub fn new(http: reqwest::Client, url: String, headers: HeaderSet, timeout: Duration) -> Self {
        Self {
            http,
            url,
            headers,
            timeout,
        }
    }

    /// the directory has to answer with a json array, entries that don't look like channels are
    /// skipped rather than failing the whole list
    pub fn parse_payload(payload: Value) -> Result<Vec<ChannelRecord>, DirectoryError> {
        let Value::Array(entries) = payload else {
            return Err(DirectoryError::MalformedUpstreamPayload(
                "expected a json array".to_string(),
            ));
        };

        let total = entries.len();
        let records: Vec<ChannelRecord> = entries
            .into_iter()
            .filter_map(ChannelRecord::from_value)
            .collect();

        if records.len() != total {
            debug!(
                "skipped {} unusable directory entries",
                total - records.len()
            );
        }

        Ok(records)
    }
}

#[async_trait]
impl DirectorySource for HttpDirectorySource {
    async fn fetch_channels(&self) -> Result<Vec<ChannelRecord>, DirectoryError> {
        let response = self
            .http
            .get(&self.url)
            .headers(self.headers.to_header_map())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| DirectoryError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status(status));
        }

        let payload: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                DirectoryError::Unreachable(e.to_string())
            } else {
                DirectoryError::MalformedUpstreamPayload(e.to_string())
            }
        })?;

        Self::parse_payload(payload)
    }
}
