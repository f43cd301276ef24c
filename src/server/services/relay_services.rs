use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use url::Url;

use crate::{
    config::AppConfig,
    directory::{DynDirectorySource, HttpDirectorySource},
    server::{
        error::{AppResult, Error},
        services::{
            catalog_services::CatalogService, channel_services::ChannelService,
            directory_services::ChannelDirectory,
            upstream_services::{DynUpstreamService, RelayRequest, UpstreamService},
        },
        utils::{catalog_utils::ChannelLogos, header_utils::HeaderSet},
    },
};

/// everything the handlers need, cheap to clone
#[derive(Clone)]
pub struct RelayServices {
    pub upstream: DynUpstreamService,
    pub directory: Arc<ChannelDirectory>,
    pub channels: Arc<ChannelService>,
    pub catalog: Arc<CatalogService>,
    /// sent on every upstream request unless the caller overrides a header
    pub base_headers: Arc<HeaderSet>,
    pub config: Arc<AppConfig>,
}

impl RelayServices {
    pub fn new(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let base_headers = Self::base_headers(&config)?;

        // one client for everything upstream, timeouts are set per request since manifests and
        // segments get different budgets
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .context("failed to build upstream http client")?;

        let source = Arc::new(HttpDirectorySource::new(
            http.clone(),
            config.directory_url.clone(),
            base_headers.clone(),
            config.directory_timeout(),
        )) as DynDirectorySource;

        let logos = ChannelLogos::load(&config.logos_path);

        Ok(Self::with_parts(config, http, source, logos, base_headers))
    }

    /// wire the services around an existing directory source
    pub fn with_parts(
        config: Arc<AppConfig>,
        http: reqwest::Client,
        source: DynDirectorySource,
        logos: ChannelLogos,
        base_headers: HeaderSet,
    ) -> Self {
        info!("starting relay services...");

        let directory = Arc::new(ChannelDirectory::new(
            source,
            config.directory_country.clone(),
            config.directory_ttl(),
        ));

        let channels = Arc::new(ChannelService::new(
            directory.clone(),
            config.stream_url_template.clone(),
        ));

        let catalog = Arc::new(CatalogService::new(directory.clone(), logos));

        let upstream = Arc::new(UpstreamService::new(
            http,
            config.manifest_timeout(),
            config.segment_timeout(),
        )) as DynUpstreamService;

        Self {
            upstream,
            directory,
            channels,
            catalog,
            base_headers: Arc::new(base_headers),
            config,
        }
    }

    pub fn base_headers(config: &AppConfig) -> anyhow::Result<HeaderSet> {
        let mut headers = HeaderSet::new();
        headers
            .insert("User-Agent", &config.upstream_user_agent)
            .context("invalid upstream user agent")?;
        headers
            .insert("Referer", &config.upstream_referer)
            .context("invalid upstream referer")?;
        headers
            .insert("Origin", &config.upstream_origin)
            .context("invalid upstream origin")?;
        Ok(headers)
    }

    /// validate the target and merge caller headers over the base set
    pub fn relay_request(&self, target_url: &str, overrides: &HeaderSet) -> AppResult<RelayRequest> {
        let target_url = Url::parse(target_url)
            .map_err(|e| Error::BadRequest(format!("Invalid URL: {}", e)))?;

        if !matches!(target_url.scheme(), "http" | "https") {
            return Err(Error::BadRequest("Invalid URL format".to_string()));
        }

        Ok(RelayRequest {
            target_url,
            headers: self.base_headers.merged(overrides),
        })
    }
}
