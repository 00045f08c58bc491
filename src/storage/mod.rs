// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Comment Storage
//!
//! The persistence collaborator of the comment lifecycle, as a trait.
//!
//! ## Implementations
//!
//! - [`InMemoryCommentStore`]: process-local map, used when no data directory
//!   is configured and in tests
//! - [`FileCommentStore`]: one JSON file per comment under
//!   `{DATA_DIR}/comments/`, written atomically via temp file + rename
//!
//! Every mutating call is a single atomic step on the backing store
//! (one write lock, or one file rename), so concurrent updates to the same
//! comment cannot interleave half-applied records.

pub mod file;
pub mod memory;
pub mod paths;

use async_trait::async_trait;
use std::io;

use crate::comments::model::{Comment, CommentStatus, Provenance};

pub use file::FileCommentStore;
pub use memory::InMemoryCommentStore;
pub use paths::StoragePaths;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A record with this id is already stored
    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence capability for comment records.
///
/// Update and delete calls return `None` when the id is unknown; they do not
/// treat that as an error. Listings are ordered by creation time, oldest
/// first.
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> StorageResult<Option<Comment>>;

    async fn insert(&self, comment: Comment) -> StorageResult<Comment>;

    /// Replace the content and bump `updated_at`.
    async fn update_content(&self, id: &str, content: String) -> StorageResult<Option<Comment>>;

    /// Set the status and bump `updated_at`.
    async fn update_status(&self, id: &str, status: CommentStatus) -> StorageResult<Option<Comment>>;

    /// Remove the record, returning it.
    async fn delete(&self, id: &str) -> StorageResult<Option<Comment>>;

    /// All comments, or only those of one provenance.
    async fn list(&self, provenance: Option<Provenance>) -> StorageResult<Vec<Comment>>;
}

/// Order a listing by creation time, then id for a stable tie-break.
pub(crate) fn sort_by_creation(comments: &mut [Comment]) {
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
}
