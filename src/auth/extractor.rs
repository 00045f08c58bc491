// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the optional bearer token.
//!
//! The extractor only pulls the raw token out of the `Authorization` header.
//! Verification belongs to the comment lifecycle, which decides per operation
//! what an absent or invalid token means.
//!
//! ```rust,ignore
//! async fn my_handler(BearerToken(token): BearerToken) -> impl IntoResponse {
//!     // token: Option<String>
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::AuthError;

/// Raw bearer token from the `Authorization` header, if one was sent.
///
/// A missing header yields `BearerToken(None)`. A header that is present but
/// not of the form `Bearer <token>` is rejected with 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(BearerToken(None));
        };

        let value = header.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = value
            .strip_prefix("Bearer ")
            .or_else(|| value.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidAuthHeader)?;

        Ok(BearerToken(Some(token.to_string())))
    }
}
