// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Two classes of failure leave this module:
//!
//! - [`KeyResolutionError`]: the key set could not be fetched or has no key
//!   for the token's `kid`. Transient from the caller's point of view; the
//!   whole request may be retried.
//! - Every other [`AuthError`] variant: the token itself is unacceptable.
//!   Never retried.
//!
//! The detailed variants exist for logging. Callers of the HTTP API only ever
//! see a generic "unauthorized" message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failure to turn a key identifier into a verification key.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KeyResolutionError {
    /// Transport-level failure reaching the key-set endpoint
    #[error("failed to fetch key set: {0}")]
    Fetch(String),
    /// The key-set endpoint did not answer within the configured timeout
    #[error("key set fetch timed out")]
    Timeout,
    /// The key-set endpoint answered with a non-success status
    #[error("HTTP {0} from key set endpoint")]
    HttpStatus(u16),
    /// The key set was fetched but contained no usable key
    #[error("key set is malformed: {0}")]
    MalformedKeySet(String),
    /// The key set does not contain the requested identifier
    #[error("no key with id {0} in key set")]
    NoMatchingKey(String),
}

/// Authentication error type.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Authorization header present but not `Bearer <token>`
    #[error("Invalid authorization header format (expected 'Bearer <token>')")]
    InvalidAuthHeader,
    /// Token cannot be parsed
    #[error("Token is malformed")]
    MalformedToken,
    /// Token header names an algorithm other than the single allowed one
    #[error("Token algorithm {0} is not allowed")]
    DisallowedAlgorithm(String),
    /// Token header carries no `kid`
    #[error("Token header has no key id")]
    MissingKeyId,
    /// Token signature is invalid
    #[error("Token signature is invalid")]
    InvalidSignature,
    /// Token has expired
    #[error("Token has expired")]
    TokenExpired,
    /// Token is not yet valid
    #[error("Token is not yet valid")]
    TokenNotYetValid,
    /// Token issuer is invalid
    #[error("Token issuer is invalid")]
    InvalidIssuer,
    /// Token audience is invalid
    #[error("Token audience is invalid")]
    InvalidAudience,
    /// Signing key could not be resolved
    #[error(transparent)]
    KeyResolution(#[from] KeyResolutionError),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
}

impl AuthError {
    /// Get the error code for this error (used as a structured log field).
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::DisallowedAlgorithm(_) => "disallowed_algorithm",
            AuthError::MissingKeyId => "missing_key_id",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenNotYetValid => "token_not_yet_valid",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::InvalidAudience => "invalid_audience",
            AuthError::KeyResolution(KeyResolutionError::NoMatchingKey(_)) => "no_matching_key",
            AuthError::KeyResolution(_) => "key_set_unavailable",
        }
    }

    /// Whether this failure came from key resolution rather than the token.
    pub fn is_key_resolution(&self) -> bool {
        matches!(self, AuthError::KeyResolution(_))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::warn!(error_code = self.error_code(), error = %self, "Request authentication failed");
        let body = Json(AuthErrorBody {
            error: "Unauthorized".to_string(),
        });
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn rejection_is_generic_401() {
        let response = AuthError::InvalidAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "Unauthorized");
    }

    #[test]
    fn key_resolution_is_classified() {
        let err = AuthError::from(KeyResolutionError::Timeout);
        assert!(err.is_key_resolution());
        assert_eq!(err.error_code(), "key_set_unavailable");

        let err = AuthError::from(KeyResolutionError::NoMatchingKey("k9".into()));
        assert_eq!(err.error_code(), "no_matching_key");

        assert!(!AuthError::TokenExpired.is_key_resolution());
    }
}
