// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! File-backed comment store.
//!
//! Each comment is stored as a separate JSON file under `{root}/comments/`.
//! Writes go to a temp file first and are renamed into place, so a reader
//! never sees a partially written record. A single async mutex serializes
//! read-modify-write cycles within the process.
//!
//! Only ids that parse as UUIDs are ever mapped to a path; any other id is
//! treated as absent, which keeps caller-supplied ids from escaping the
//! comments directory.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{sort_by_creation, CommentStore, StorageError, StoragePaths, StorageResult};
use crate::comments::model::{Comment, CommentStatus, Provenance};

pub struct FileCommentStore {
    paths: StoragePaths,
    write_lock: Mutex<()>,
}

impl FileCommentStore {
    /// Open the store, creating the directory layout if needed.
    pub fn open(paths: StoragePaths) -> StorageResult<Self> {
        fs::create_dir_all(paths.comments_dir())?;
        tracing::info!(dir = %paths.comments_dir().display(), "File comment store ready");
        Ok(Self {
            paths,
            write_lock: Mutex::new(()),
        })
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Ids match exactly, as in the in-memory store: only the canonical
    /// lowercase hyphenated form names a record.
    fn record_path(&self, id: &str) -> Option<PathBuf> {
        let canonical = Uuid::parse_str(id).ok()?.hyphenated().to_string();
        (canonical == id).then(|| self.paths.comment(&canonical))
    }

    fn load(&self, id: &str) -> StorageResult<Option<Comment>> {
        let Some(path) = self.record_path(id) else {
            return Ok(None);
        };
        read_json(&path)
    }

    fn modify(&self, id: &str, apply: impl FnOnce(&mut Comment)) -> StorageResult<Option<Comment>> {
        let Some(path) = self.record_path(id) else {
            return Ok(None);
        };
        let Some(mut comment) = read_json::<Comment>(&path)? else {
            return Ok(None);
        };
        apply(&mut comment);
        comment.updated_at = Utc::now();
        write_json(&path, &comment)?;
        Ok(Some(comment))
    }
}

#[async_trait]
impl CommentStore for FileCommentStore {
    async fn find_by_id(&self, id: &str) -> StorageResult<Option<Comment>> {
        self.load(id)
    }

    async fn insert(&self, comment: Comment) -> StorageResult<Comment> {
        let _guard = self.write_lock.lock().await;
        let path = self
            .record_path(&comment.id)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "comment id is not a UUID"))?;

        if path.exists() {
            return Err(StorageError::AlreadyExists(format!("Comment {}", comment.id)));
        }
        write_json(&path, &comment)?;
        Ok(comment)
    }

    async fn update_content(&self, id: &str, content: String) -> StorageResult<Option<Comment>> {
        let _guard = self.write_lock.lock().await;
        self.modify(id, |comment| comment.content = content)
    }

    async fn update_status(&self, id: &str, status: CommentStatus) -> StorageResult<Option<Comment>> {
        let _guard = self.write_lock.lock().await;
        self.modify(id, |comment| comment.status = status)
    }

    async fn delete(&self, id: &str) -> StorageResult<Option<Comment>> {
        let _guard = self.write_lock.lock().await;
        let Some(path) = self.record_path(id) else {
            return Ok(None);
        };
        let Some(comment) = read_json::<Comment>(&path)? else {
            return Ok(None);
        };
        fs::remove_file(&path)?;
        Ok(Some(comment))
    }

    async fn list(&self, provenance: Option<Provenance>) -> StorageResult<Vec<Comment>> {
        let mut listed = Vec::new();
        for entry in fs::read_dir(self.paths.comments_dir())? {
            let path = entry?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            match read_json::<Comment>(&path) {
                Ok(Some(comment)) if provenance.is_none_or(|p| comment.provenance == p) => listed.push(comment),
                Ok(_) => {}
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable comment record"),
            }
        }
        sort_by_creation(&mut listed);
        Ok(listed)
    }
}

/// Read and deserialize a JSON file; a missing file is `None`.
fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(Some(value))
}

/// Write a JSON file (atomic write via rename).
fn write_json<T: Serialize>(path: &Path, value: &T) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }

    fs::rename(&temp_path, path)?;
    Ok(())
}
