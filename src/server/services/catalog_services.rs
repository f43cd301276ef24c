// the add-on side of things is plain data shaping on top of the directory
use std::sync::Arc;

use tracing::debug;

use crate::directory::ChannelRecord;
use crate::server::{
    dtos::addon_dto::{
        AddonManifest, BehaviorHints, CatalogDescriptor, CatalogExtra, MetaItem, StreamItem,
    },
    services::directory_services::ChannelDirectory,
    utils::catalog_utils::{ChannelLogos, channel_genre, placeholder_background},
};

pub const ADDON_ID: &str = "org.tvrelay.live";
pub const ADDON_NAME: &str = "TV Relay";
pub const CATALOG_TYPE: &str = "tv";
pub const CATALOG_ID: &str = "tvrelay_live";
pub const CATALOG_PAGE_SIZE: usize = 100;

pub struct CatalogService {
    directory: Arc<ChannelDirectory>,
    logos: ChannelLogos,
}

impl CatalogService {
    pub fn new(directory: Arc<ChannelDirectory>, logos: ChannelLogos) -> Self {
        Self { directory, logos }
    }

    pub fn logos(&self) -> &ChannelLogos {
        &self.logos
    }

    pub fn manifest(&self) -> AddonManifest {
        let country = self.directory.country();

        AddonManifest {
            id: ADDON_ID,
            version: env!("CARGO_PKG_VERSION"),
            name: ADDON_NAME,
            description: format!("Live {} channels through the relay", country),
            resources: vec!["catalog", "meta", "stream"],
            types: vec![CATALOG_TYPE],
            catalogs: vec![CatalogDescriptor {
                kind: CATALOG_TYPE,
                id: CATALOG_ID,
                name: format!("Live TV ({})", country),
                extra: vec![CatalogExtra {
                    name: "search",
                    is_required: false,
                }],
            }],
            behavior_hints: BehaviorHints {
                configurable: false,
                configuration_required: false,
            },
            logo: "https://vavoo.to/favicon.ico",
        }
    }

    pub fn meta_for(&self, record: &ChannelRecord) -> MetaItem {
        let logo = self.logos.logo_for(&record.name);

        MetaItem {
            id: record.id.clone(),
            kind: CATALOG_TYPE,
            name: record.name.clone(),
            genres: vec![channel_genre(&record.name)],
            poster: logo.clone(),
            poster_shape: "square",
            background: placeholder_background(&record.name),
            logo,
        }
    }

    /// one page of the catalog, `search` is a case-insensitive substring match on the name
    pub async fn catalog(&self, search: Option<&str>, skip: usize) -> Vec<MetaItem> {
        let snapshot = self.directory.get().await;
        let search = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let metas: Vec<MetaItem> = snapshot
            .records
            .iter()
            .filter(|record| match &search {
                Some(needle) => record.name.to_lowercase().contains(needle),
                None => true,
            })
            .skip(skip)
            .take(CATALOG_PAGE_SIZE)
            .map(|record| self.meta_for(record))
            .collect();

        debug!("returning {} catalog entries (skip {})", metas.len(), skip);
        metas
    }

    pub async fn meta(&self, channel_id: &str) -> Option<MetaItem> {
        self.directory
            .find(channel_id)
            .await
            .map(|record| self.meta_for(&record))
    }

    /// single stream pointing back at the relay, `public_base` has no trailing slash
    pub fn stream_for(public_base: &str, channel_id: &str, channel_name: &str) -> StreamItem {
        StreamItem {
            url: format!(
                "{}/channel/{}/manifest",
                public_base,
                urlencoding::encode(channel_id)
            ),
            title: format!("{} - Live", channel_name),
            name: ADDON_NAME,
        }
    }
}
