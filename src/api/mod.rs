// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::FromRequest,
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    comments::{Comment, CommentStatus, Provenance},
    error::ApiError,
    models::{CreateCommentRequest, DeleteCommentResponse, UpdateContentRequest, UpdateStatusRequest},
    state::AppState,
};

pub mod comments;
pub mod health;

/// `Json` extractor whose rejections use the API's JSON error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// CORS policy: a single allowed origin, or permissive when none is configured.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, header::InvalidHeaderValue> {
    let Some(origin) = origin else {
        return Ok(CorsLayer::permissive());
    };
    Ok(CorsLayer::new()
        .allow_origin(HeaderValue::from_str(origin)?)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    let api_routes = Router::new()
        .route("/comments", get(comments::list_comments))
        .route(
            "/comments/verified",
            get(comments::list_verified_comments).post(comments::create_verified_comment),
        )
        .route(
            "/comments/guest",
            get(comments::list_guest_comments).post(comments::create_guest_comment),
        )
        .route("/comments/{comment_id}/status", patch(comments::update_comment_status))
        .route("/comments/{comment_id}/content", patch(comments::update_comment_content))
        .route("/comments/{comment_id}", delete(comments::delete_comment))
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors),
        )
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        comments::list_comments,
        comments::list_verified_comments,
        comments::list_guest_comments,
        comments::create_guest_comment,
        comments::create_verified_comment,
        comments::update_comment_status,
        comments::update_comment_content,
        comments::delete_comment,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Comment,
            CommentStatus,
            Provenance,
            CreateCommentRequest,
            UpdateContentRequest,
            UpdateStatusRequest,
            DeleteCommentResponse,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Comments", description = "Public comments and moderation"),
        (name = "Health", description = "Liveness and readiness checks")
    )
)]
struct ApiDoc;
