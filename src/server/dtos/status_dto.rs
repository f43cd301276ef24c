use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub channels_count: usize,
    pub logos_count: usize,
    /// unix seconds of the last successful directory refresh, 0 if there never was one
    pub cache_timestamp: i64,
    pub cache_age_seconds: f64,
    pub uptime_seconds: u64,
    pub version: String,
}
