// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization policy for comment operations.
//!
//! Pure decisions over `(identity, operation)`: no IO, no clock, no panics.
//! Operations that act on an existing comment carry it, so a decision can
//! never be asked about a target that was not loaded.
//!
//! | Operation               | Identity | Rule                          |
//! |-------------------------|----------|-------------------------------|
//! | `CreateGuestComment`    | ignored  | always allowed                |
//! | `CreateVerifiedComment` | required | any verified identity         |
//! | `ReadComments`          | ignored  | always allowed                |
//! | `EditContent`           | required | owner only, roles irrelevant  |
//! | `DeleteComment`         | required | owner or moderator            |
//! | `ChangeStatus`          | required | moderator only                |

use serde::Serialize;

use super::model::{Comment, CommentStatus};
use crate::auth::Identity;

/// Something a caller asks to do.
#[derive(Debug, Clone, Copy)]
pub enum Operation<'a> {
    CreateGuestComment,
    CreateVerifiedComment,
    ReadComments,
    EditContent(&'a Comment),
    DeleteComment(&'a Comment),
    ChangeStatus(&'a Comment, CommentStatus),
}

impl Operation<'_> {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateGuestComment => "create_guest_comment",
            Operation::CreateVerifiedComment => "create_verified_comment",
            Operation::ReadComments => "read_comments",
            Operation::EditContent(_) => "edit_content",
            Operation::DeleteComment(_) => "delete_comment",
            Operation::ChangeStatus(..) => "change_status",
        }
    }
}

/// Why a request was denied. For logging only; callers see a bare 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    /// The operation needs an identity and the request carried none.
    NoIdentity,
    /// The identity does not own the comment.
    NotOwner,
    /// The identity neither owns the comment nor holds the moderation role.
    NotOwnerOrModerator,
    /// The identity lacks the moderation role.
    NotModerator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

/// Decide whether `identity` may perform `operation`.
///
/// `moderator_role` is the configured name of the privileged moderation role.
pub fn authorize(identity: Option<&Identity>, operation: Operation<'_>, moderator_role: &str) -> Decision {
    match operation {
        Operation::CreateGuestComment | Operation::ReadComments => Decision::Allowed,
        Operation::CreateVerifiedComment => match identity {
            Some(_) => Decision::Allowed,
            None => Decision::Denied(Denial::NoIdentity),
        },
        Operation::EditContent(comment) => {
            let Some(identity) = identity else {
                return Decision::Denied(Denial::NoIdentity);
            };
            if comment.is_authored_by(&identity.subject) {
                Decision::Allowed
            } else {
                Decision::Denied(Denial::NotOwner)
            }
        }
        Operation::DeleteComment(comment) => {
            let Some(identity) = identity else {
                return Decision::Denied(Denial::NoIdentity);
            };
            if comment.is_authored_by(&identity.subject) || identity.has_role(moderator_role) {
                Decision::Allowed
            } else {
                Decision::Denied(Denial::NotOwnerOrModerator)
            }
        }
        Operation::ChangeStatus(..) => match identity {
            Some(identity) if identity.has_role(moderator_role) => Decision::Allowed,
            Some(_) => Decision::Denied(Denial::NotModerator),
            None => Decision::Denied(Denial::NoIdentity),
        },
    }
}
