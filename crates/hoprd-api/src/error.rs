//! Error responses.
//!
//! Every failure is rendered as `{"status": <CODE>, "error": <message>}`
//! with a stable code per status class. Handlers classify by error
//! variant, never by message content.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hoprd_types::{AggregationError, ResolutionError};

/// Body of every non-2xx response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: String,
    pub error: String,
}

/// Failure of an API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input, e.g. an undecodable peer id.
    #[error("{0}")]
    InvalidInput(String),

    /// The alias is not in the cache.
    #[error("{0}")]
    UnknownAlias(String),

    /// A subsystem needed for the response failed.
    #[error("{0}")]
    Unprocessable(String),

    /// Missing or wrong API token.
    #[error("invalid or missing API token")]
    Unauthorized,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::UnknownAlias(_) => StatusCode::NOT_FOUND,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::UnknownAlias(_) => "UNKNOWN_ALIAS",
            Self::Unprocessable(_) => "UNPROCESSABLE",
            Self::Unauthorized => "UNAUTHORIZED",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            status: self.code().to_string(),
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ResolutionError> for ApiError {
    fn from(e: ResolutionError) -> Self {
        match e {
            ResolutionError::InvalidFormat { .. } => Self::InvalidInput(e.to_string()),
            ResolutionError::UnknownAlias { .. } => Self::UnknownAlias(e.to_string()),
        }
    }
}

impl From<AggregationError> for ApiError {
    fn from(e: AggregationError) -> Self {
        tracing::warn!(error = %e, "aggregation failed");
        Self::Unprocessable(e.to_string())
    }
}
