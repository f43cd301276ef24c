use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::{debug, warn};

use crate::server::error::Error;
use crate::server::utils::header_utils::HeaderSet;

/// `?url=...&header_<name>=<value>...` of the relay endpoints
pub struct RelayQuery {
    pub url: String,
    /// only what the caller sent, the base headers are merged in later
    pub headers: HeaderSet,
}

impl RelayQuery {
    pub fn parse(query: &str) -> Result<Self, Error> {
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        let url = pairs
            .iter()
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(Error::MissingParameter("url"))?;

        let headers =
            HeaderSet::from_query_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .map_err(|e| {
                    warn!("rejecting relay request: {}", e);
                    Error::BadRequest(e.to_string())
                })?;

        debug!("relay query for {} with {} headers", url, headers.len());
        Ok(Self { url, headers })
    }
}

/// the query is decoded by hand because repeated/dynamic `header_*` keys don't fit a struct
impl<S> FromRequestParts<S> for RelayQuery
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::parse(parts.uri.query().unwrap_or(""))
    }
}
