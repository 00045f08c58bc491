// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Auth0 bearer token verification for the comment API.
//!
//! ## Auth Flow
//!
//! 1. Frontend (Vue SPA) authenticates the visitor with Auth0
//! 2. Frontend sends `Authorization: Bearer <access token>`
//! 3. Server:
//!    - Resolves the token's `kid` against the tenant JWKS (cached)
//!    - Verifies signature, algorithm, expiry, issuer, audience
//!    - Extracts:
//!      - `sub` → [`Identity::subject`]
//!      - the configured custom role claim → [`Identity::roles`]
//!
//! ## Security
//!
//! - Exactly one asymmetric algorithm is accepted (RS256 by default)
//! - JWKS is fetched over HTTPS with a bounded timeout
//! - Clock skew tolerance is 60 seconds
//! - A request without a token has no identity; guest operations accept that

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod roles;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testutil;

pub use claims::Identity;
pub use error::{AuthError, KeyResolutionError};
pub use extractor::BearerToken;
pub use jwks::{HttpKeySetSource, KeyResolver, KeySetSource};
pub use roles::RoleSet;
pub use verifier::TokenVerifier;
