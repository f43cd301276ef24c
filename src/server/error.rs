use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::services::upstream_services::RelayError;

pub type AppResult<T> = Result<T, Error>;

/// everything a handler can fail with, rendered as a short plain text body so players get an
/// explicit failure instead of an empty response
#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing '{0}' parameter")]
    MissingParameter(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: RelayError,
    },

    #[error("Internal server error")]
    InternalServerError,

    #[error("{0}")]
    InternalServerErrorWithContext(String),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::InternalServerError | Self::InternalServerErrorWithContext(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("Error: {}", self),
        )
            .into_response()
    }
}
