// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role names carried in a verified token.

use std::collections::BTreeSet;

use serde_json::Value;

/// Set of role names read from the configured custom role claim.
///
/// Role names are compared exactly (case-sensitive), the way the identity
/// provider issues them. A missing claim is an empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet(BTreeSet<String>);

impl RoleSet {
    /// Build a role set from an explicit list of names.
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }

    /// Parse the role claim value.
    ///
    /// Accepts an array of strings or a single space-delimited string.
    /// Non-string array members are ignored.
    pub fn from_claim(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Array(items)) => Self(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            Some(Value::String(s)) => Self(s.split_whitespace().map(str::to_string).collect()),
            _ => Self::default(),
        }
    }

    /// Whether the set contains the given role.
    pub fn contains(&self, role: &str) -> bool {
        self.0.contains(role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl std::fmt::Display for RoleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "[{}]", joined.join(","))
    }
}
