// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory comment store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{sort_by_creation, CommentStore, StorageError, StorageResult};
use crate::comments::model::{Comment, CommentStatus, Provenance};

#[derive(Default)]
pub struct InMemoryCommentStore {
    comments: RwLock<HashMap<String, Comment>>,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.comments.read().await.len()
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn find_by_id(&self, id: &str) -> StorageResult<Option<Comment>> {
        Ok(self.comments.read().await.get(id).cloned())
    }

    async fn insert(&self, comment: Comment) -> StorageResult<Comment> {
        let mut comments = self.comments.write().await;
        if comments.contains_key(&comment.id) {
            return Err(StorageError::AlreadyExists(format!("Comment {}", comment.id)));
        }
        comments.insert(comment.id.clone(), comment.clone());
        Ok(comment)
    }

    async fn update_content(&self, id: &str, content: String) -> StorageResult<Option<Comment>> {
        let mut comments = self.comments.write().await;
        Ok(comments.get_mut(id).map(|comment| {
            comment.content = content;
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn update_status(&self, id: &str, status: CommentStatus) -> StorageResult<Option<Comment>> {
        let mut comments = self.comments.write().await;
        Ok(comments.get_mut(id).map(|comment| {
            comment.status = status;
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn delete(&self, id: &str) -> StorageResult<Option<Comment>> {
        Ok(self.comments.write().await.remove(id))
    }

    async fn list(&self, provenance: Option<Provenance>) -> StorageResult<Vec<Comment>> {
        let mut listed: Vec<Comment> = self
            .comments
            .read()
            .await
            .values()
            .filter(|c| provenance.is_none_or(|p| c.provenance == p))
            .cloned()
            .collect();
        sort_by_creation(&mut listed);
        Ok(listed)
    }
}
