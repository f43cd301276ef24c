use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::server::{
    error::{AppResult, Error},
    services::directory_services::ChannelDirectory,
};

pub const UNKNOWN_CHANNEL_NAME: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct ResolvedChannel {
    pub id: String,
    pub name: String,
    pub manifest_url: Url,
}

/// turns channel ids into upstream manifest urls. the url itself comes from a template, the
/// directory is only asked so unknown ids can be rejected and logs have a name
pub struct ChannelService {
    directory: Arc<ChannelDirectory>,
    stream_url_template: String,
}

impl ChannelService {
    pub fn new(directory: Arc<ChannelDirectory>, stream_url_template: String) -> Self {
        Self {
            directory,
            stream_url_template,
        }
    }

    /// `{id}` in the template is replaced with the percent-encoded id
    pub fn manifest_url_for(template: &str, channel_id: &str) -> AppResult<Url> {
        let url = template.replace("{id}", &urlencoding::encode(channel_id));
        Url::parse(&url).map_err(|e| {
            Error::InternalServerErrorWithContext(format!(
                "stream url template produced an invalid url: {}",
                e
            ))
        })
    }

    pub async fn resolve_manifest(&self, channel_id: &str) -> AppResult<ResolvedChannel> {
        let snapshot = self.directory.get().await;

        let name = match snapshot.find(channel_id) {
            Some(record) => record.name.clone(),
            // an empty directory means upstream has never answered, don't block playback on it
            None if snapshot.records.is_empty() => {
                warn!(
                    "channel directory is empty, relaying {} without validation",
                    channel_id
                );
                UNKNOWN_CHANNEL_NAME.to_string()
            }
            None => {
                return Err(Error::NotFound(format!(
                    "Channel {} not found",
                    channel_id
                )));
            }
        };

        let manifest_url = Self::manifest_url_for(&self.stream_url_template, channel_id)?;
        debug!("Resolved channel {} ({}) to {}", channel_id, name, manifest_url);

        Ok(ResolvedChannel {
            id: channel_id.to_string(),
            name,
            manifest_url,
        })
    }

    /// display name for a channel, no validation
    pub async fn channel_name(&self, channel_id: &str) -> String {
        self.directory
            .find(channel_id)
            .await
            .map(|record| record.name)
            .unwrap_or_else(|| UNKNOWN_CHANNEL_NAME.to_string())
    }
}
