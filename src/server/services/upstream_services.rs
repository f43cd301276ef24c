use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use futures::{StreamExt, stream::BoxStream};
use reqwest::{
    StatusCode,
    header::{self, HeaderMap, HeaderName, HeaderValue},
};
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::server::utils::{
    header_utils::HeaderSet,
    playlist_utils::{PlaylistKind, classify},
};

/// upstream response headers that survive the segment relay, content type is always replaced
const FORWARDED_SEGMENT_HEADERS: [HeaderName; 7] = [
    header::CONTENT_LENGTH,
    header::CONTENT_RANGE,
    header::CONTENT_ENCODING,
    header::ACCEPT_RANGES,
    header::CACHE_CONTROL,
    header::ETAG,
    header::LAST_MODIFIED,
];

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),
    #[error("upstream returned status {status}")]
    UpstreamError { status: StatusCode },
    #[error("too many redirects: {0}")]
    RedirectLoop(String),
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_redirect() {
            Self::RedirectLoop(err.to_string())
        } else if let Some(status) = err.status() {
            Self::UpstreamError { status }
        } else {
            Self::UpstreamUnreachable(err.to_string())
        }
    }
}

/// one upstream fetch, both the manifest and segment paths use this so neither knows about
/// channels
#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub target_url: Url,
    pub headers: HeaderSet,
}

/// fetched playlist, never cached because upstream urls rotate
#[derive(Debug, Clone)]
pub struct PlaylistDocument {
    pub body: Bytes,
    /// url after redirects, relative references resolve against this one
    pub final_url: Url,
    pub is_multi_segment: bool,
}

impl PlaylistDocument {
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// upstream segment body as it arrives, dropping this aborts the upstream request
pub struct SegmentStream {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: BoxStream<'static, Result<Bytes, reqwest::Error>>,
}

pub type DynUpstreamService = Arc<dyn UpstreamServiceTrait + Send + Sync>;

#[async_trait]
pub trait UpstreamServiceTrait {
    /// GET a playlist, following redirects, and classify it
    async fn fetch_playlist(&self, request: &RelayRequest) -> Result<PlaylistDocument, RelayError>;

    /// open a segment for streaming, `range` is forwarded as-is
    async fn open_segment(
        &self,
        request: &RelayRequest,
        range: Option<HeaderValue>,
    ) -> Result<SegmentStream, RelayError>;
}

pub struct UpstreamService {
    http: reqwest::Client,
    manifest_timeout: Duration,
    segment_timeout: Duration,
}

impl UpstreamService {
    /// `http` should carry the redirect budget, see `RelayServices::new`
    pub fn new(http: reqwest::Client, manifest_timeout: Duration, segment_timeout: Duration) -> Self {
        Self {
            http,
            manifest_timeout,
            segment_timeout,
        }
    }
}

#[async_trait]
impl UpstreamServiceTrait for UpstreamService {
    async fn fetch_playlist(&self, request: &RelayRequest) -> Result<PlaylistDocument, RelayError> {
        debug!("Fetching playlist: {}", request.target_url);

        let response = self
            .http
            .get(request.target_url.clone())
            .headers(request.headers.to_header_map())
            .timeout(self.manifest_timeout)
            .send()
            .await
            .map_err(|e| {
                error!("Playlist request failed: {}", e);
                RelayError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            // don't log the body, it's usually some cloudflare html page
            error!(
                "Playlist upstream {} answered with {}",
                request.target_url, status
            );
            return Err(RelayError::UpstreamError { status });
        }

        let final_url = response.url().clone();
        if final_url != request.target_url {
            debug!("Playlist redirected to {}", final_url);
        }

        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read playlist body: {}", e);
            RelayError::from(e)
        })?;

        let is_multi_segment =
            classify(&String::from_utf8_lossy(&body)) == PlaylistKind::MultiSegmentManifest;
        debug!(
            "Read {} playlist bytes, multi segment: {}",
            body.len(),
            is_multi_segment
        );

        Ok(PlaylistDocument {
            body,
            final_url,
            is_multi_segment,
        })
    }

    async fn open_segment(
        &self,
        request: &RelayRequest,
        range: Option<HeaderValue>,
    ) -> Result<SegmentStream, RelayError> {
        let mut request_builder = self
            .http
            .get(request.target_url.clone())
            .headers(request.headers.to_header_map())
            .timeout(self.segment_timeout);

        if let Some(range) = range {
            request_builder = request_builder.header(header::RANGE, range);
        }

        let response = request_builder.send().await.map_err(|e| {
            error!("Segment request failed: {}", e);
            RelayError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                "Segment upstream {} answered with {}",
                request.target_url, status
            );
            return Err(RelayError::UpstreamError { status });
        }

        let mut headers = HeaderMap::new();
        for name in FORWARDED_SEGMENT_HEADERS {
            if let Some(value) = response.headers().get(&name) {
                headers.insert(name, value.clone());
            }
        }

        Ok(SegmentStream {
            status,
            headers,
            body: response.bytes_stream().boxed(),
        })
    }
}
