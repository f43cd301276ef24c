use axum::Extension;
use axum::extract::FromRequestParts;
use axum::http::{header::HOST, request::Parts};

use crate::server::error::Error;
use crate::server::services::RelayServices;

/// base url clients reach the relay on, without a trailing slash
pub struct PublicBaseUrl(pub String);

impl PublicBaseUrl {
    /// PUBLIC_URL wins, otherwise X-Forwarded-Proto + Host. anything that isn't localhost is
    /// assumed to sit behind tls
    pub fn derive(configured: Option<&str>, forwarded_proto: Option<&str>, host: &str) -> String {
        if let Some(configured) = configured {
            return configured.trim_end_matches('/').to_string();
        }

        let scheme = match forwarded_proto {
            Some(proto) => proto.split(',').next().unwrap_or("https").trim(),
            None if host.starts_with("localhost") || host.starts_with("127.") => "http",
            None => "https",
        };

        format!("{}://{}", scheme, host)
    }
}

impl<S> FromRequestParts<S> for PublicBaseUrl
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(services): Extension<RelayServices> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|err| Error::InternalServerErrorWithContext(err.to_string()))?;

        let header = |name: &str| parts.headers.get(name).and_then(|h| h.to_str().ok());

        let host = header(HOST.as_str())
            .map(|h| h.to_string())
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_else(|| format!("localhost:{}", services.config.port));

        Ok(PublicBaseUrl(Self::derive(
            services.config.public_url.as_deref(),
            header("x-forwarded-proto"),
            &host,
        )))
    }
}
