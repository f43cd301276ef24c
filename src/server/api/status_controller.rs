use axum::Extension;
use axum::Json;

use crate::server::dtos::status_dto::StatusResponse;
use crate::server::services::RelayServices;
use crate::server::{get_app_version, get_uptime_seconds};

/// status endpoint, reads whatever snapshot is cached and never triggers a directory refresh
pub async fn status_endpoint(
    Extension(services): Extension<RelayServices>,
) -> Json<StatusResponse> {
    let snapshot = services.directory.current();

    Json(StatusResponse {
        status: "online",
        channels_count: snapshot.records.len(),
        logos_count: services.catalog.logos().len(),
        cache_timestamp: snapshot.fetched_at.map_or(0, |t| t.timestamp()),
        cache_age_seconds: snapshot.age().map_or(0.0, |age| age.as_secs_f64()),
        uptime_seconds: get_uptime_seconds(),
        version: get_app_version().to_string(),
    })
}
