// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Comment lifecycle: identity → load → policy → mutate.
//!
//! Each operation runs as one read-decide-mutate unit:
//!
//! 1. If a bearer token was supplied and the operation looks at identity,
//!    verify it. A failed verification is [`CommentError::Unauthenticated`]
//!    and the store is never touched.
//! 2. Load the target comment; absent is [`CommentError::NotFound`].
//! 3. Ask the policy. A denial is [`CommentError::Forbidden`], no mutation.
//! 4. Apply the mutation through the store and return the resulting record.
//!
//! Status moves freely between `PENDING`, `APPROVED` and `REJECTED`, but
//! only through [`CommentService::change_status`], which is moderator-only.

use std::sync::Arc;

use tracing::{info, warn};

use super::model::{validate_content, Comment, CommentDraft, CommentStatus, Provenance};
use super::policy::{authorize, Decision, Operation};
use crate::auth::{AuthError, Identity, TokenVerifier};
use crate::storage::{CommentStore, StorageError};

/// Outcome of a failed comment operation.
#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    /// A token was supplied and failed verification.
    #[error("unauthenticated: {0}")]
    Unauthenticated(#[source] AuthError),
    /// Identity (or its absence) is not permitted to do this.
    #[error("forbidden")]
    Forbidden,
    #[error("comment not found")]
    NotFound,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

pub type CommentResult<T> = Result<T, CommentError>;

/// The comment lifecycle manager.
pub struct CommentService {
    store: Arc<dyn CommentStore>,
    verifier: Arc<TokenVerifier>,
    moderator_role: String,
}

impl CommentService {
    pub fn new(store: Arc<dyn CommentStore>, verifier: Arc<TokenVerifier>) -> Self {
        let moderator_role = verifier.settings().moderator_role.clone();
        Self {
            store,
            verifier,
            moderator_role,
        }
    }

    /// Create a guest comment. Any token is ignored.
    pub async fn create_guest(&self, draft: CommentDraft) -> CommentResult<Comment> {
        self.check(None, Operation::CreateGuestComment)?;
        let draft = draft.normalized().map_err(CommentError::InvalidInput)?;

        let comment = self.store.insert(Comment::guest(draft)).await?;
        info!(comment_id = %comment.id, provenance = %comment.provenance, "Created comment");
        Ok(comment)
    }

    /// Create a verified comment owned by the token's subject.
    pub async fn create_verified(&self, token: Option<&str>, draft: CommentDraft) -> CommentResult<Comment> {
        let identity = self.identify(token).await?;
        self.check(identity.as_ref(), Operation::CreateVerifiedComment)?;
        let Some(identity) = identity else {
            return Err(CommentError::Forbidden);
        };
        let draft = draft.normalized().map_err(CommentError::InvalidInput)?;

        let comment = self.store.insert(Comment::verified(draft, identity.subject)).await?;
        info!(
            comment_id = %comment.id,
            provenance = %comment.provenance,
            subject = comment.author_id.as_deref().unwrap_or_default(),
            "Created comment"
        );
        Ok(comment)
    }

    /// List comments, optionally filtered by provenance. Public.
    pub async fn list(&self, provenance: Option<Provenance>) -> CommentResult<Vec<Comment>> {
        self.check(None, Operation::ReadComments)?;
        let comments = self.store.list(provenance).await?;
        tracing::debug!(count = comments.len(), provenance = ?provenance, "Listed comments");
        Ok(comments)
    }

    /// Replace the content of a comment. Owner only.
    pub async fn update_content(&self, token: Option<&str>, id: &str, content: &str) -> CommentResult<Comment> {
        let identity = self.identify(token).await?;
        let comment = self.load(id).await?;
        self.check(identity.as_ref(), Operation::EditContent(&comment))?;
        let content = validate_content(content).map_err(CommentError::InvalidInput)?;

        let updated = self
            .store
            .update_content(id, content)
            .await?
            .ok_or(CommentError::NotFound)?;
        info!(comment_id = %updated.id, "Updated comment content");
        Ok(updated)
    }

    /// Move a comment to `status`. Moderator only.
    pub async fn change_status(&self, token: Option<&str>, id: &str, status: CommentStatus) -> CommentResult<Comment> {
        let identity = self.identify(token).await?;
        let comment = self.load(id).await?;
        self.check(identity.as_ref(), Operation::ChangeStatus(&comment, status))?;

        let updated = self
            .store
            .update_status(id, status)
            .await?
            .ok_or(CommentError::NotFound)?;
        info!(comment_id = %updated.id, from = %comment.status, to = %updated.status, "Changed comment status");
        Ok(updated)
    }

    /// Delete a comment. Owner or moderator.
    pub async fn delete(&self, token: Option<&str>, id: &str) -> CommentResult<Comment> {
        let identity = self.identify(token).await?;
        let comment = self.load(id).await?;
        self.check(identity.as_ref(), Operation::DeleteComment(&comment))?;

        let deleted = self.store.delete(id).await?.ok_or(CommentError::NotFound)?;
        info!(comment_id = %deleted.id, "Deleted comment");
        Ok(deleted)
    }

    /// Verify the token if one was supplied. No token is no identity.
    async fn identify(&self, token: Option<&str>) -> CommentResult<Option<Identity>> {
        let Some(token) = token else {
            return Ok(None);
        };
        match self.verifier.verify(token).await {
            Ok(identity) => Ok(Some(identity)),
            Err(e) => {
                warn!(error_code = e.error_code(), error = %e, "Token verification failed");
                Err(CommentError::Unauthenticated(e))
            }
        }
    }

    async fn load(&self, id: &str) -> CommentResult<Comment> {
        self.store.find_by_id(id).await?.ok_or(CommentError::NotFound)
    }

    fn check(&self, identity: Option<&Identity>, operation: Operation<'_>) -> CommentResult<()> {
        match authorize(identity, operation, &self.moderator_role) {
            Decision::Allowed => Ok(()),
            Decision::Denied(reason) => {
                warn!(
                    operation = operation.name(),
                    subject = identity.map(|i| i.subject.as_str()).unwrap_or_default(),
                    reason = ?reason,
                    "Operation denied"
                );
                Err(CommentError::Forbidden)
            }
        }
    }
}
