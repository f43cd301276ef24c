use axum::{Extension, Router, extract::Path, response::Response, routing::get};
use tracing::info;

use crate::server::{
    api::proxy_controller::ProxyController,
    error::AppResult,
    services::{RelayServices, upstream_services::RelayRequest},
};

pub struct ChannelController;

impl ChannelController {
    pub fn app() -> Router {
        Router::new().route("/{channel_id}/manifest", get(Self::channel_manifest))
    }

    /// same as /proxy/manifest but the upstream url comes from the channel id
    async fn channel_manifest(
        Extension(services): Extension<RelayServices>,
        Path(channel_id): Path<String>,
    ) -> AppResult<Response> {
        let channel = services.channels.resolve_manifest(&channel_id).await?;
        info!("Stream request for {} ({})", channel.name, channel.id);

        let request = RelayRequest {
            target_url: channel.manifest_url,
            headers: services.base_headers.as_ref().clone(),
        };

        ProxyController::relay_manifest(&services, request).await
    }
}
