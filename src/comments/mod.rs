// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Public comments: record model, authorization policy, and lifecycle.

pub mod model;
pub mod policy;
pub mod service;

pub use model::{Comment, CommentDraft, CommentStatus, Provenance};
pub use policy::{authorize, Decision, Denial, Operation};
pub use service::{CommentError, CommentResult, CommentService};
