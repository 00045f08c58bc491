// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and the verified caller identity.

use std::collections::HashMap;

use serde::Deserialize;

use super::roles::RoleSet;

/// Claims read from a verified Auth0 access token.
///
/// `exp`, `nbf`, `iss` and `aud` are checked by `jsonwebtoken` during decode
/// and are not read here. The role claim lives under a tenant-specific key
/// (e.g. `https://example.com/roles`), so everything besides `sub` is kept in
/// `extra` and looked up by the configured name.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID), e.g. `auth0|64f1c...`
    pub sub: String,

    /// Remaining claims, including the custom role claim
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Identity of the caller, derived per request from a verified token.
///
/// A request without a token has no `Identity` at all; that is a valid state
/// for guest operations, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable user identifier (`sub` claim)
    pub subject: String,
    /// Role names from the configured role claim
    pub roles: RoleSet,
}

impl Identity {
    pub fn new(subject: impl Into<String>, roles: RoleSet) -> Self {
        Self {
            subject: subject.into(),
            roles,
        }
    }

    /// Build the identity from decoded claims.
    pub fn from_claims(claims: TokenClaims, role_claim: &str) -> Self {
        let roles = RoleSet::from_claim(claims.extra.get(role_claim));
        Self {
            subject: claims.sub,
            roles,
        }
    }

    /// Check if the identity carries the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}
