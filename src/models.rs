// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the comment API. All types derive
//! `ToSchema` for the OpenAPI document; JSON field names are camelCase.
//!
//! Create requests deliberately have no status, provenance, or author
//! fields. Unknown fields such as `authorId` are ignored, so a client cannot
//! influence them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::comments::{CommentDraft, CommentStatus};

/// Body of `POST /comments/guest` and `POST /comments/verified`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub first_name: String,
    pub last_name: String,
    pub content: String,
    /// Optional avatar image URL
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl From<CreateCommentRequest> for CommentDraft {
    fn from(request: CreateCommentRequest) -> Self {
        CommentDraft {
            first_name: request.first_name,
            last_name: request.last_name,
            content: request.content,
            avatar_url: request.avatar_url,
        }
    }
}

/// Body of `PATCH /comments/{id}/content`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UpdateContentRequest {
    pub content: String,
}

/// Body of `PATCH /comments/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UpdateStatusRequest {
    pub status: CommentStatus,
}

/// Response of `DELETE /comments/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCommentResponse {
    pub message: String,
    pub comment_id: String,
}
