use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::directory::{ChannelRecord, DynDirectorySource, filter_by_country};

/// immutable view of the directory, refreshes build a new one and swap the pointer
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    pub records: Vec<ChannelRecord>,
    pub fetched_at: Option<DateTime<Utc>>,
    fetched_instant: Option<Instant>,
}

impl DirectorySnapshot {
    pub fn new(records: Vec<ChannelRecord>) -> Self {
        Self {
            records,
            fetched_at: Some(Utc::now()),
            fetched_instant: Some(Instant::now()),
        }
    }

    pub fn age(&self) -> Option<Duration> {
        self.fetched_instant.map(|fetched| fetched.elapsed())
    }

    /// an empty snapshot is never fresh, it always gets another shot at upstream
    pub fn is_fresh(&self, freshness: Duration) -> bool {
        !self.records.is_empty() && self.age().is_some_and(|age| age < freshness)
    }

    pub fn find(&self, channel_id: &str) -> Option<&ChannelRecord> {
        self.records.iter().find(|record| record.id == channel_id)
    }
}

/// short lived cache of the upstream channel list. readers only ever clone an `Arc` out of the
/// lock, so a refresh in flight never blocks anyone from using the previous snapshot
pub struct ChannelDirectory {
    source: DynDirectorySource,
    country: String,
    freshness: Duration,
    snapshot: RwLock<Arc<DirectorySnapshot>>,
}

impl ChannelDirectory {
    pub fn new(source: DynDirectorySource, country: String, freshness: Duration) -> Self {
        Self {
            source,
            country,
            freshness,
            snapshot: RwLock::new(Arc::new(DirectorySnapshot::default())),
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// whatever is cached right now, never touches the network
    pub fn current(&self) -> Arc<DirectorySnapshot> {
        self.snapshot.read().clone()
    }

    /// the channel list, refreshed when the snapshot is stale or empty. upstream failures never
    /// make it to the caller: the previous snapshot (however old) or an empty one comes back
    pub async fn get(&self) -> Arc<DirectorySnapshot> {
        let current = self.current();
        if current.is_fresh(self.freshness) {
            debug!(
                "directory snapshot is fresh ({} channels)",
                current.records.len()
            );
            return current;
        }

        match self.source.fetch_channels().await {
            Ok(records) => {
                let total = records.len();
                let snapshot = Arc::new(DirectorySnapshot::new(filter_by_country(
                    records,
                    &self.country,
                )));
                info!(
                    "loaded {} {} channels out of {}",
                    snapshot.records.len(),
                    self.country,
                    total
                );
                metrics::counter!("directory_refresh_total", "outcome" => "ok").increment(1);

                *self.snapshot.write() = snapshot.clone();
                snapshot
            }
            Err(e) => {
                metrics::counter!("directory_refresh_total", "outcome" => "error").increment(1);
                // someone else may have refreshed while we were waiting, prefer theirs
                let fallback = self.current();
                error!(
                    "error loading channels: {}, serving {} cached channels",
                    e,
                    fallback.records.len()
                );
                fallback
            }
        }
    }

    pub async fn find(&self, channel_id: &str) -> Option<ChannelRecord> {
        self.get().await.find(channel_id).cloned()
    }
}
