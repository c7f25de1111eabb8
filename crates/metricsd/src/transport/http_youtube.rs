// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the YouTube OAuth flow and channel sync.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::Counters;
use crate::transport::http::{store_error, UpdateMetricsResponse};
use crate::youtube::client::YoutubeService;
use crate::youtube::YoutubeError;

/// Embedded OAuth result pages.
const SUCCESS_PAGE: &str = include_str!("web/oauth_success.html");
const FAILURE_PAGE: &str = include_str!("web/oauth_failure.html");

/// Helper to get the YouTube service or return 400.
fn get_youtube(s: &AppState) -> Result<&YoutubeService, Box<Response>> {
    s.youtube.as_ref().ok_or_else(|| {
        Box::new(
            ApiError::BadRequest
                .to_http_response("youtube integration not configured")
                .into_response(),
        )
    })
}

/// `GET /oauth/youtube/authorize` — send the caller's browser to the consent page.
pub async fn oauth_authorize(State(s): State<Arc<AppState>>) -> impl IntoResponse {
    let yt = match get_youtube(&s) {
        Ok(y) => y,
        Err(resp) => return *resp,
    };
    Redirect::temporary(&yt.authorize_url()).into_response()
}

/// Query parameters Google sends back to the redirect URI.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /oauth/youtube/callback` — exchange the code and persist the token pair.
///
/// Answers HTML either way; the token file is only touched on success.
pub async fn oauth_callback(
    State(s): State<Arc<AppState>>,
    Query(q): Query<CallbackQuery>,
) -> impl IntoResponse {
    let yt = match get_youtube(&s) {
        Ok(y) => y,
        Err(resp) => return *resp,
    };

    if let Some(denied) = q.error {
        tracing::warn!(err = %denied, "youtube authorization denied");
        return (StatusCode::BAD_GATEWAY, Html(failure_page(&denied))).into_response();
    }
    let Some(code) = q.code else {
        return ApiError::BadRequest
            .to_http_response("missing code parameter")
            .into_response();
    };

    match yt.complete_authorization(&code).await {
        Ok(()) => {
            tracing::info!("youtube authorization complete");
            Html(SUCCESS_PAGE).into_response()
        }
        Err(e) => {
            tracing::warn!(err = %e, "youtube token exchange failed");
            (StatusCode::BAD_GATEWAY, Html(failure_page(&e.to_string()))).into_response()
        }
    }
}

/// `POST /api/youtube/sync/{owner}` — pull channel statistics into the store.
pub async fn sync_owner(
    State(s): State<Arc<AppState>>,
    Path(owner): Path<String>,
) -> impl IntoResponse {
    let yt = match get_youtube(&s) {
        Ok(y) => y,
        Err(resp) => return *resp,
    };
    let Some(handle) = yt.channels().handle_for(&owner).map(str::to_owned) else {
        return ApiError::BadRequest
            .to_http_response(format!("no channel configured for owner: {owner}"))
            .into_response();
    };

    match sync_one(&s, yt, &owner, &handle).await {
        Ok(counters) => Json(UpdateMetricsResponse {
            success: true,
            message: format!("Updated {owner}/youtube"),
            data: counters,
        })
        .into_response(),
        Err(failure) => failure.into_response(),
    }
}

/// Per-owner outcome for `POST /api/youtube/sync`.
#[derive(Debug, Serialize)]
pub struct SyncResult {
    pub owner: String,
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Counters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SyncAllResponse {
    pub success: bool,
    pub results: Vec<SyncResult>,
}

/// `POST /api/youtube/sync` — sync every owner in the channel table.
///
/// Partial failure is reported per owner; the request itself fails only when
/// every owner failed.
pub async fn sync_all(State(s): State<Arc<AppState>>) -> impl IntoResponse {
    let yt = match get_youtube(&s) {
        Ok(y) => y,
        Err(resp) => return *resp,
    };
    let channels = yt.channels().channels.clone();
    if channels.is_empty() {
        return ApiError::BadRequest.to_http_response("no channels configured").into_response();
    }

    let mut results = Vec::with_capacity(channels.len());
    let mut any_ok = false;
    for channel in channels {
        match sync_one(&s, yt, &channel.owner, &channel.handle).await {
            Ok(counters) => {
                any_ok = true;
                results.push(SyncResult {
                    owner: channel.owner,
                    handle: channel.handle,
                    data: Some(counters),
                    error: None,
                });
            }
            Err(failure) => {
                tracing::warn!(owner = %channel.owner, err = %failure, "youtube sync failed");
                results.push(SyncResult {
                    owner: channel.owner,
                    handle: channel.handle,
                    data: None,
                    error: Some(failure.to_string()),
                });
            }
        }
    }

    let status = if any_ok { StatusCode::OK } else { StatusCode::BAD_GATEWAY };
    (status, Json(SyncAllResponse { success: any_ok, results })).into_response()
}

/// Why a single owner's sync failed.
#[derive(Debug, thiserror::Error)]
enum SyncFailure {
    #[error(transparent)]
    Youtube(YoutubeError),
    #[error(transparent)]
    Store(crate::store::persist::StoreError),
}

impl SyncFailure {
    fn into_response(self) -> Response {
        match self {
            Self::Youtube(e) => youtube_error(e),
            Self::Store(e) => store_error(e),
        }
    }
}

/// Fetch one owner's channel counters and merge them under `{owner}.youtube`.
/// The store is untouched when the fetch fails.
async fn sync_one(
    state: &AppState,
    yt: &YoutubeService,
    owner: &str,
    handle: &str,
) -> Result<Counters, SyncFailure> {
    let counters =
        yt.fetch_channel_metrics(handle).await.map_err(SyncFailure::Youtube)?;

    let owner = owner.to_owned();
    state
        .store
        .update(move |doc| {
            doc.owners.entry(owner).or_default().insert("youtube".to_owned(), counters.clone());
            counters
        })
        .await
        .map_err(SyncFailure::Store)
}

/// Convert a provider failure into its HTTP response.
fn youtube_error(e: YoutubeError) -> Response {
    let code = match &e {
        YoutubeError::NotAuthenticated => ApiError::NotAuthenticated,
        YoutubeError::ChannelNotFound(_) => ApiError::ChannelNotFound,
        YoutubeError::Upstream(_) => ApiError::UpstreamError,
    };
    tracing::warn!(err = %e, "youtube request failed");
    code.to_http_response(e.to_string()).into_response()
}

fn failure_page(message: &str) -> String {
    FAILURE_PAGE.replace("{message}", &html_escape(message))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
