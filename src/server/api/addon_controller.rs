// catalog add-on routes, these only shape directory data and hand out relay urls
use axum::{Extension, Json, Router, extract::Path, routing::get};
use tracing::info;

use crate::server::{
    dtos::addon_dto::{
        AddonManifest, CatalogExtraQuery, CatalogResponse, MetaResponse, StreamResponse,
    },
    extractors::PublicBaseUrl,
    services::{
        RelayServices,
        catalog_services::{CATALOG_ID, CATALOG_TYPE, CatalogService},
    },
};

pub struct AddonController;

impl AddonController {
    pub fn app() -> Router {
        Router::new()
            .route("/manifest.json", get(Self::manifest))
            .route("/catalog/{kind}/{catalog_id}", get(Self::catalog))
            .route("/catalog/{kind}/{catalog_id}/{extra}", get(Self::catalog_with_extra))
            .route("/meta/{kind}/{file}", get(Self::meta))
            .route("/stream/{kind}/{file}", get(Self::stream))
    }

    async fn manifest(Extension(services): Extension<RelayServices>) -> Json<AddonManifest> {
        Json(services.catalog.manifest())
    }

    async fn catalog(
        Extension(services): Extension<RelayServices>,
        Path((kind, file)): Path<(String, String)>,
    ) -> Json<CatalogResponse> {
        let catalog_id = strip_json(&file);
        Json(Self::catalog_page(&services, &kind, catalog_id, CatalogExtraQuery::default()).await)
    }

    async fn catalog_with_extra(
        Extension(services): Extension<RelayServices>,
        Path((kind, catalog_id, extra)): Path<(String, String, String)>,
    ) -> Json<CatalogResponse> {
        let extra = parse_extra(strip_json(&extra));
        Json(Self::catalog_page(&services, &kind, &catalog_id, extra).await)
    }

    async fn catalog_page(
        services: &RelayServices,
        kind: &str,
        catalog_id: &str,
        extra: CatalogExtraQuery,
    ) -> CatalogResponse {
        info!("Catalog request received: {}/{}", kind, catalog_id);

        if kind != CATALOG_TYPE || catalog_id != CATALOG_ID {
            return CatalogResponse { metas: Vec::new() };
        }

        let skip = extra
            .skip
            .as_deref()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let metas = services
            .catalog
            .catalog(extra.search.as_deref(), skip)
            .await;

        info!("Returning {} channels", metas.len());
        CatalogResponse { metas }
    }

    async fn meta(
        Extension(services): Extension<RelayServices>,
        Path((kind, file)): Path<(String, String)>,
    ) -> Json<MetaResponse> {
        let channel_id = strip_json(&file);
        info!("Meta request received: {}/{}", kind, channel_id);

        if kind != CATALOG_TYPE {
            return Json(MetaResponse { meta: None });
        }

        Json(MetaResponse {
            meta: services.catalog.meta(channel_id).await,
        })
    }

    async fn stream(
        Extension(services): Extension<RelayServices>,
        PublicBaseUrl(public_base): PublicBaseUrl,
        Path((kind, file)): Path<(String, String)>,
    ) -> Json<StreamResponse> {
        let channel_id = strip_json(&file);
        info!("Stream request received: {}/{}", kind, channel_id);

        if kind != CATALOG_TYPE {
            return Json(StreamResponse {
                streams: Vec::new(),
            });
        }

        let name = services.channels.channel_name(channel_id).await;

        Json(StreamResponse {
            streams: vec![CatalogService::stream_for(&public_base, channel_id, &name)],
        })
    }
}

fn strip_json(segment: &str) -> &str {
    segment.strip_suffix(".json").unwrap_or(segment)
}

/// `search=rai&skip=100`, unknown keys are ignored
pub fn parse_extra(extra: &str) -> CatalogExtraQuery {
    let mut query = CatalogExtraQuery::default();
    for (key, value) in url::form_urlencoded::parse(extra.as_bytes()) {
        match key.as_ref() {
            "search" => query.search = Some(value.into_owned()),
            "skip" => query.skip = Some(value.into_owned()),
            _ => {}
        }
    }
    query
}
