// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Comment record and its enumerations.
//!
//! A comment is created through one of two paths. The path alone decides its
//! [`Provenance`]; a guest comment never carries an `author_id`, a verified
//! comment always does. Constructors are the only way to build a new record,
//! so that invariant holds for every comment the service inserts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Maximum accepted comment length, in characters.
pub const MAX_CONTENT_CHARS: usize = 5000;

/// Moderation status of a comment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CommentStatus::Pending => "PENDING",
            CommentStatus::Approved => "APPROVED",
            CommentStatus::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// Which creation path produced a comment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provenance {
    Guest,
    Verified,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Provenance::Guest => "GUEST",
            Provenance::Verified => "VERIFIED",
        })
    }
}

/// A public comment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique comment identifier (UUID), immutable
    pub id: String,
    pub status: CommentStatus,
    /// Immutable after creation
    pub provenance: Provenance,
    /// Verified subject of the author; absent for guest comments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub content: String,
    /// Self-reported avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author-supplied fields of a new comment.
///
/// Carries no status, provenance or author id: those are set by the
/// creation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub first_name: String,
    pub last_name: String,
    pub content: String,
    pub avatar_url: Option<String>,
}

impl CommentDraft {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            content: content.into(),
            avatar_url: None,
        }
    }

    pub fn with_avatar(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Trim names and content, and reject blank or oversized fields.
    pub fn normalized(self) -> Result<Self, String> {
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        if first_name.is_empty() || last_name.is_empty() {
            return Err("First and last name are required".to_string());
        }

        let content = validate_content(&self.content)?;
        let avatar_url = self
            .avatar_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Ok(Self {
            first_name,
            last_name,
            content,
            avatar_url,
        })
    }
}

/// Validate and trim comment content.
pub fn validate_content(content: &str) -> Result<String, String> {
    let content = content.trim();
    if content.is_empty() {
        return Err("Content must not be empty".to_string());
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(format!("Content exceeds {MAX_CONTENT_CHARS} characters"));
    }
    Ok(content.to_string())
}

impl Comment {
    /// New guest comment: `PENDING`, no author.
    pub fn guest(draft: CommentDraft) -> Self {
        Self::build(draft, Provenance::Guest, None)
    }

    /// New verified comment owned by `subject`: `PENDING`.
    pub fn verified(draft: CommentDraft, subject: impl Into<String>) -> Self {
        Self::build(draft, Provenance::Verified, Some(subject.into()))
    }

    fn build(draft: CommentDraft, provenance: Provenance, author_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            status: CommentStatus::Pending,
            provenance,
            author_id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            content: draft.content,
            avatar_url: draft.avatar_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `subject` authored this comment. Guest comments have no owner.
    pub fn is_authored_by(&self, subject: &str) -> bool {
        self.author_id.as_deref() == Some(subject)
    }
}
