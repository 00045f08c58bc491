// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Portfolio Comments - comment authorization and moderation API
//!
//! Public comments for a personal site. Visitors post as guests or as
//! Auth0-verified users; moderators approve or reject.
//!
//! ## Modules
//!
//! - `auth` - JWKS key resolution and bearer token verification
//! - `comments` - comment model, authorization policy, lifecycle
//! - `storage` - comment persistence (in-memory or JSON files)
//! - `api` - HTTP API handlers (Axum)

pub mod api;
pub mod auth;
pub mod comments;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;
