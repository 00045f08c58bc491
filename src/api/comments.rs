// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::ApiJson;
use crate::{
    auth::BearerToken,
    comments::{Comment, Provenance},
    error::ApiError,
    models::{CreateCommentRequest, DeleteCommentResponse, UpdateContentRequest, UpdateStatusRequest},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/comments",
    tag = "Comments",
    responses((status = 200, body = [Comment]))
)]
pub async fn list_comments(State(state): State<AppState>) -> Result<Json<Vec<Comment>>, ApiError> {
    Ok(Json(state.comments.list(None).await?))
}

#[utoipa::path(
    get,
    path = "/comments/verified",
    tag = "Comments",
    responses((status = 200, body = [Comment]))
)]
pub async fn list_verified_comments(State(state): State<AppState>) -> Result<Json<Vec<Comment>>, ApiError> {
    Ok(Json(state.comments.list(Some(Provenance::Verified)).await?))
}

#[utoipa::path(
    get,
    path = "/comments/guest",
    tag = "Comments",
    responses((status = 200, body = [Comment]))
)]
pub async fn list_guest_comments(State(state): State<AppState>) -> Result<Json<Vec<Comment>>, ApiError> {
    Ok(Json(state.comments.list(Some(Provenance::Guest)).await?))
}

#[utoipa::path(
    post,
    path = "/comments/guest",
    request_body = CreateCommentRequest,
    tag = "Comments",
    responses(
        (status = 201, body = Comment),
        (status = 400, description = "Missing or oversized fields")
    )
)]
pub async fn create_guest_comment(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state.comments.create_guest(request.into()).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    post,
    path = "/comments/verified",
    request_body = CreateCommentRequest,
    tag = "Comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, body = Comment),
        (status = 400, description = "Missing or oversized fields"),
        (status = 401, description = "Invalid bearer token"),
        (status = 403, description = "No bearer token")
    )
)]
pub async fn create_verified_comment(
    State(state): State<AppState>,
    token: BearerToken,
    ApiJson(request): ApiJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state
        .comments
        .create_verified(token.as_deref(), request.into())
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[utoipa::path(
    patch,
    path = "/comments/{comment_id}/status",
    params(
        ("comment_id" = String, Path, description = "Identifier of the comment to moderate")
    ),
    request_body = UpdateStatusRequest,
    tag = "Comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = Comment),
        (status = 401, description = "Invalid bearer token"),
        (status = 403, description = "Moderation role required"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn update_comment_status(
    Path(comment_id): Path<String>,
    State(state): State<AppState>,
    token: BearerToken,
    ApiJson(request): ApiJson<UpdateStatusRequest>,
) -> Result<Json<Comment>, ApiError> {
    let comment = state
        .comments
        .change_status(token.as_deref(), &comment_id, request.status)
        .await?;
    Ok(Json(comment))
}

#[utoipa::path(
    patch,
    path = "/comments/{comment_id}/content",
    params(
        ("comment_id" = String, Path, description = "Identifier of the comment to edit")
    ),
    request_body = UpdateContentRequest,
    tag = "Comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = Comment),
        (status = 400, description = "Empty or oversized content"),
        (status = 401, description = "Invalid bearer token"),
        (status = 403, description = "Only the author may edit"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn update_comment_content(
    Path(comment_id): Path<String>,
    State(state): State<AppState>,
    token: BearerToken,
    ApiJson(request): ApiJson<UpdateContentRequest>,
) -> Result<Json<Comment>, ApiError> {
    let comment = state
        .comments
        .update_content(token.as_deref(), &comment_id, &request.content)
        .await?;
    Ok(Json(comment))
}

#[utoipa::path(
    delete,
    path = "/comments/{comment_id}",
    params(
        ("comment_id" = String, Path, description = "Identifier of the comment to delete")
    ),
    tag = "Comments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, body = DeleteCommentResponse),
        (status = 401, description = "Invalid bearer token"),
        (status = 403, description = "Author or moderation role required"),
        (status = 404, description = "Comment not found")
    )
)]
pub async fn delete_comment(
    Path(comment_id): Path<String>,
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<DeleteCommentResponse>, ApiError> {
    let deleted = state.comments.delete(token.as_deref(), &comment_id).await?;
    Ok(Json(DeleteCommentResponse {
        message: "Comment deleted".to_string(),
        comment_id: deleted.id,
    }))
}
