// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path layout for the file-backed comment store.
//!
//! ```text
//! {root}/
//!   comments/
//!     {comment_id}.json
//! ```

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct StoragePaths {
    root: PathBuf,
}

impl StoragePaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory containing all comment records.
    pub fn comments_dir(&self) -> PathBuf {
        self.root.join("comments")
    }

    /// Path to a single comment record.
    pub fn comment(&self, comment_id: &str) -> PathBuf {
        self.comments_dir().join(format!("{comment_id}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_path_layout() {
        let paths = StoragePaths::new("/data");
        assert_eq!(paths.comments_dir(), PathBuf::from("/data/comments"));
        assert_eq!(paths.comment("abc"), PathBuf::from("/data/comments/abc.json"));
    }
}
