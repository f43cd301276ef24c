// manifest and segment relay, the only two routes that actually talk to stream upstreams
use axum::{
    Extension, Router,
    body::{Body, Bytes},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{debug, error};

use crate::server::{
    error::{AppResult, Error},
    extractors::RelayQuery,
    services::{RelayServices, upstream_services::RelayRequest},
    utils::playlist_utils::rewrite_manifest,
};

/// content type for playlists handed back untouched
pub const SIMPLE_PLAYLIST_CONTENT_TYPE: &str = "audio/x-mpegurl";
/// content type for manifests after rewriting
pub const MULTI_SEGMENT_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";
/// segments always go out as transport stream, whatever upstream claims
pub const SEGMENT_CONTENT_TYPE: &str = "video/mp2t";

pub struct ProxyController;

impl ProxyController {
    pub fn app() -> Router {
        Router::new()
            .route("/manifest", get(Self::proxy_manifest))
            .route("/segment", get(Self::proxy_segment))
    }

    async fn proxy_manifest(
        Extension(services): Extension<RelayServices>,
        query: RelayQuery,
    ) -> AppResult<Response> {
        let request = services.relay_request(&query.url, &query.headers)?;
        Self::relay_manifest(&services, request).await
    }

    /// fetch -> classify -> rewrite if needed. shared with the channel route
    pub async fn relay_manifest(
        services: &RelayServices,
        request: RelayRequest,
    ) -> AppResult<Response> {
        debug!("Relaying manifest: {}", request.target_url);

        let document = services
            .upstream
            .fetch_playlist(&request)
            .await
            .map_err(|e| {
                error!("Error downloading manifest {}: {}", request.target_url, e);
                metrics::counter!("relay_upstream_errors_total", "route" => "manifest")
                    .increment(1);
                Error::Upstream {
                    context: "Error downloading manifest",
                    source: e,
                }
            })?;

        if !document.is_multi_segment {
            metrics::counter!("relay_manifest_requests_total", "kind" => "simple").increment(1);
            debug!("Simple playlist, passing {} bytes through", document.body.len());
            return Ok(Self::playlist_response(
                SIMPLE_PLAYLIST_CONTENT_TYPE,
                document.body,
            ));
        }

        metrics::counter!("relay_manifest_requests_total", "kind" => "multi_segment").increment(1);
        let rewritten = rewrite_manifest(&document.text(), &document.final_url, &request.headers);
        debug!(
            "Rewrote manifest from {} to {} bytes",
            document.body.len(),
            rewritten.len()
        );

        Ok(Self::playlist_response(
            MULTI_SEGMENT_CONTENT_TYPE,
            Bytes::from(rewritten),
        ))
    }

    fn playlist_response(content_type: &'static str, body: Bytes) -> Response {
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, content_type),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            body,
        )
            .into_response()
    }

    /// streams the segment through without buffering it. when the client goes away axum drops
    /// the body, which drops the upstream response and closes that connection
    async fn proxy_segment(
        Extension(services): Extension<RelayServices>,
        headers: HeaderMap,
        query: RelayQuery,
    ) -> AppResult<Response> {
        let request = services.relay_request(&query.url, &query.headers)?;
        let range = headers.get(header::RANGE).cloned();

        debug!("Relaying segment: {} (range: {:?})", request.target_url, range);
        metrics::counter!("relay_segment_requests_total").increment(1);

        let segment = services
            .upstream
            .open_segment(&request, range)
            .await
            .map_err(|e| {
                error!("Error downloading segment {}: {}", request.target_url, e);
                metrics::counter!("relay_upstream_errors_total", "route" => "segment")
                    .increment(1);
                Error::Upstream {
                    context: "Error downloading segment",
                    source: e,
                }
            })?;

        let mut response = Response::builder()
            .status(segment.status)
            .header(header::CONTENT_TYPE, SEGMENT_CONTENT_TYPE);

        for (name, value) in segment.headers.iter() {
            response = response.header(name, value);
        }

        response.body(Body::from_stream(segment.body)).map_err(|e| {
            error!("Failed to build segment response: {}", e);
            Error::InternalServerErrorWithContext("Failed to build segment response".to_string())
        })
    }
}
