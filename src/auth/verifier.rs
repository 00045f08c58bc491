// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification.
//!
//! Order of checks:
//!
//! 1. Parse the header. Reject unless `alg` is the configured asymmetric
//!    algorithm. No key lookup happens for a disallowed algorithm, which
//!    closes the RS256/HS256 confusion path.
//! 2. Resolve the `kid` through the [`KeyResolver`]. An unknown `kid` fails
//!    here, before any signature work.
//! 3. Verify signature, `exp`/`nbf` (60 s leeway), `aud`, and `iss` (exact).
//! 4. Read `sub` and the configured role claim into an [`Identity`].

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Validation};

use super::claims::{Identity, TokenClaims};
use super::error::AuthError;
use super::jwks::KeyResolver;
use crate::config::AuthSettings;

/// Clock skew tolerance (60 seconds).
pub const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Verifies bearer tokens and produces the caller's [`Identity`].
pub struct TokenVerifier {
    resolver: Arc<KeyResolver>,
    settings: AuthSettings,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(resolver: Arc<KeyResolver>, settings: AuthSettings) -> Self {
        let mut validation = Validation::new(settings.algorithm);
        validation.leeway = CLOCK_SKEW_LEEWAY;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_audience(&[&settings.audience]);
        validation.set_issuer(&[&settings.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "aud", "iss"]);

        Self {
            resolver,
            settings,
            validation,
        }
    }

    /// The key resolver backing this verifier.
    pub fn resolver(&self) -> &Arc<KeyResolver> {
        &self.resolver
    }

    pub fn settings(&self) -> &AuthSettings {
        &self.settings
    }

    /// Verify a raw token (without the `Bearer ` prefix).
    pub async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;

        if header.alg != self.settings.algorithm {
            return Err(AuthError::DisallowedAlgorithm(format!("{:?}", header.alg)));
        }

        let kid = header.kid.as_deref().ok_or(AuthError::MissingKeyId)?;
        let key = self.resolver.resolve(kid).await?;

        let token_data = decode::<TokenClaims>(token, &key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
            ErrorKind::InvalidAudience => AuthError::InvalidAudience,
            ErrorKind::InvalidAlgorithm => AuthError::DisallowedAlgorithm(format!("{:?}", header.alg)),
            _ => AuthError::MalformedToken,
        })?;

        let identity = Identity::from_claims(token_data.claims, &self.settings.role_claim);
        tracing::debug!(subject = %identity.subject, roles = %identity.roles, "Token verified");
        Ok(identity)
    }
}
