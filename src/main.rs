use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;

use tracing::info;

use tvrelay::{AppConfig, Logger, RelayApplicationServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Arc::new(AppConfig::parse());

    // guards are kept alive to flush logs and keep the sentry client around
    let _guards = Logger::init(config.cargo_env, config.sentry_dsn.clone());

    info!(
        "logger and env prepped, relaying {} channels from {}",
        config.directory_country, config.directory_url
    );

    RelayApplicationServer::serve(config)
        .await
        .context("relay server failed to start")?;

    Ok(())
}
