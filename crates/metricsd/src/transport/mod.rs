// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP transport for the metrics API.

pub mod http;
pub mod http_youtube;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Build the axum `Router` with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/api/health", get(http::health))
        // Metrics store
        .route("/api/metrics", get(http::get_all_metrics))
        .route(
            "/api/metrics/{owner}/{platform}",
            get(http::get_platform_metrics).post(http::update_platform_metrics),
        )
        // YouTube OAuth + sync (return 400 when the integration is not configured)
        .route("/oauth/youtube/authorize", get(http_youtube::oauth_authorize))
        .route("/oauth/youtube/callback", get(http_youtube::oauth_callback))
        .route("/api/youtube/sync", post(http_youtube::sync_all))
        .route("/api/youtube/sync/{owner}", post(http_youtube::sync_owner))
        // Middleware
        .layer(CorsLayer::permissive())
        .with_state(state)
}
