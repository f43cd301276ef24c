use std::time::Duration;

#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum CargoEnv {
    Development,
    Production,
}

#[derive(clap::Parser, Clone, Debug)]
pub struct AppConfig {
    // production or development
    #[clap(long, env, value_enum, default_value = "development")]
    pub cargo_env: CargoEnv,

    // port that the app will bind to
    #[clap(long, env, default_value = "10000")]
    pub port: u16,

    // upstream directory returning the full channel list as a json array
    #[clap(long, env, default_value = "https://vavoo.to/channels")]
    pub directory_url: String,

    // only channels whose `country` matches exactly are kept
    #[clap(long, env, default_value = "Italy")]
    pub directory_country: String,

    // freshness window of the channel snapshot
    #[clap(long, env, default_value = "600")]
    pub directory_ttl_seconds: u64,

    #[clap(long, env, default_value = "10")]
    pub directory_timeout_seconds: u64,

    // `{id}` is replaced with the percent-encoded channel id
    #[clap(long, env, default_value = "https://vavoo.to/play/{id}/index.m3u8")]
    pub stream_url_template: String,

    #[clap(long, env, default_value = "10")]
    pub manifest_timeout_seconds: u64,

    #[clap(long, env, default_value = "15")]
    pub segment_timeout_seconds: u64,

    #[clap(long, env, default_value = "5")]
    pub max_redirects: usize,

    // base header set sent on every upstream request, callers can override these per request
    #[clap(long, env, default_value = DEFAULT_USER_AGENT)]
    pub upstream_user_agent: String,

    #[clap(long, env, default_value = "https://vavoo.to/")]
    pub upstream_referer: String,

    #[clap(long, env, default_value = "https://vavoo.to")]
    pub upstream_origin: String,

    // json array of { "name": ..., "logo": ... }, a missing file just means placeholders
    #[clap(long, env, default_value = "channel_logos.json")]
    pub logos_path: String,

    // externally visible base url, used when handing relay urls to the catalog. when unset it's
    // derived from the Host header
    #[clap(long, env)]
    pub public_url: Option<String>,

    // this should be either * for allowing everything, or a comma seperated list of origins like
    // https://example.com,https://something.com
    #[clap(long, env, default_value = "*")]
    pub cors_origin: String,

    // optional sentry integration
    #[clap(long, env)]
    pub sentry_dsn: Option<String>,
}

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 11; SM-G991B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.120 Mobile Safari/537.36";

impl AppConfig {
    pub fn directory_ttl(&self) -> Duration {
        Duration::from_secs(self.directory_ttl_seconds)
    }

    pub fn directory_timeout(&self) -> Duration {
        Duration::from_secs(self.directory_timeout_seconds)
    }

    pub fn manifest_timeout(&self) -> Duration {
        Duration::from_secs(self.manifest_timeout_seconds)
    }

    pub fn segment_timeout(&self) -> Duration {
        Duration::from_secs(self.segment_timeout_seconds)
    }
}

impl Default for AppConfig {
    // keep in sync with the clap defaults above, tests build configs from this
    fn default() -> Self {
        Self {
            cargo_env: CargoEnv::Development,
            port: 10000,
            directory_url: "https://vavoo.to/channels".to_string(),
            directory_country: "Italy".to_string(),
            directory_ttl_seconds: 600,
            directory_timeout_seconds: 10,
            stream_url_template: "https://vavoo.to/play/{id}/index.m3u8".to_string(),
            manifest_timeout_seconds: 10,
            segment_timeout_seconds: 15,
            max_redirects: 5,
            upstream_user_agent: DEFAULT_USER_AGENT.to_string(),
            upstream_referer: "https://vavoo.to/".to_string(),
            upstream_origin: "https://vavoo.to".to_string(),
            logos_path: "channel_logos.json".to_string(),
            public_url: None,
            cors_origin: "*".to_string(),
            sentry_dsn: None,
        }
    }
}
