pub mod api;
pub mod dtos;
pub mod error;
pub mod extractors;
pub mod services;
pub mod utils;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::{
    Extension, Router,
    http::{HeaderValue, Method},
    routing::get,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use once_cell::sync::Lazy;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::AppConfig;
use api::{
    addon_controller::AddonController, channel_controller::ChannelController,
    proxy_controller::ProxyController, status_controller::status_endpoint,
};
use services::RelayServices;

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

pub fn get_app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn get_uptime_seconds() -> u64 {
    START_TIME.elapsed().as_secs()
}

pub struct RelayApplicationServer;

impl RelayApplicationServer {
    /// every route with its layers, no metrics recorder and no listener so tests can mount it
    pub fn router(services: RelayServices) -> Router {
        let cors = Self::cors_layer(&services.config.cors_origin);

        Router::new()
            .nest("/proxy", ProxyController::app())
            .nest("/channel", ChannelController::app())
            .merge(AddonController::app())
            .route("/status", get(status_endpoint))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors)
                    .layer(Extension(services)),
            )
    }

    pub async fn serve(config: Arc<AppConfig>) -> anyhow::Result<()> {
        Lazy::force(&START_TIME);

        let services = RelayServices::new(config.clone())?;

        // warm the directory so the first catalog request doesn't pay for it
        let directory = services.directory.clone();
        tokio::spawn(async move {
            let snapshot = directory.get().await;
            info!("directory warmed with {} channels", snapshot.records.len());
        });

        let metrics = PrometheusBuilder::new()
            .install_recorder()
            .context("failed to install prometheus recorder")?;

        let app = Self::router(services)
            .route("/metrics", get(move || std::future::ready(metrics.render())));

        let listener = TcpListener::bind(("0.0.0.0", config.port))
            .await
            .with_context(|| format!("failed to bind port {}", config.port))?;

        info!("relay listening on {}", listener.local_addr()?);

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

        info!("relay shut down");
        Ok(())
    }

    fn cors_layer(cors_origin: &str) -> CorsLayer {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(Any);

        if cors_origin.trim() == "*" {
            return cors.allow_origin(Any);
        }

        let origins: Vec<HeaderValue> = cors_origin
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .filter_map(|o| match o.parse() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    warn!("ignoring invalid cors origin {}", o);
                    None
                }
            })
            .collect();

        cors.allow_origin(origins)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
