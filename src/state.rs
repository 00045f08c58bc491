// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{KeyResolver, TokenVerifier};
use crate::comments::CommentService;
use crate::storage::CommentStore;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub comments: Arc<CommentService>,
    /// Key cache, shared with the verifier; used by the readiness probe
    pub keys: Arc<KeyResolver>,
}

impl AppState {
    pub fn new(store: Arc<dyn CommentStore>, verifier: Arc<TokenVerifier>) -> Self {
        let keys = verifier.resolver().clone();
        Self {
            comments: Arc::new(CommentService::new(store, verifier)),
            keys,
        }
    }
}
