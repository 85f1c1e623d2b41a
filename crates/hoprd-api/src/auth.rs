//! API token middleware.
//!
//! The token is accepted from either header:
//!
//! - `x-auth-token: <token>`
//! - `Authorization: Bearer <token>`
//!
//! The token is stored as raw bytes and compared in constant time.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;

const TOKEN_HEADER: &str = "x-auth-token";

/// The configured API token.
#[derive(Clone)]
pub struct ApiToken {
    bytes: Arc<Vec<u8>>,
}

impl ApiToken {
    pub fn new(token: &str) -> Self {
        Self {
            bytes: Arc::new(token.as_bytes().to_vec()),
        }
    }

    /// Returns `true` if the headers carry this token.
    pub fn verify(&self, headers: &HeaderMap) -> bool {
        if let Some(value) = headers.get(TOKEN_HEADER) {
            return constant_time_eq(value.as_bytes(), &self.bytes);
        }

        let Some(value) = headers.get(axum::http::header::AUTHORIZATION) else {
            return false;
        };
        let provided = value.as_bytes();
        if provided.len() > 7 && provided[..7].eq_ignore_ascii_case(b"Bearer ") {
            constant_time_eq(&provided[7..], &self.bytes)
        } else {
            false
        }
    }
}

/// Rejects requests without a valid token.
pub async fn require_token(
    State(token): State<ApiToken>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !token.verify(request.headers()) {
        tracing::debug!(uri = %request.uri(), "rejecting unauthenticated request");
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(request).await)
}

/// Compares two byte slices in constant time.
///
/// Time depends only on the lengths, not on the content.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
