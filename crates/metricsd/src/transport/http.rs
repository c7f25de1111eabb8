// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the metrics store.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::{now_iso, AppState};
use crate::store::persist::StoreError;
use crate::store::{CounterPatch, Counters};

// -- Request/Response types ---------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    /// Only reported when the YouTube layer is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
}

/// A counter value as clients supply it: a JSON integer or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CounterValue {
    Number(serde_json::Number),
    Text(String),
}

impl CounterValue {
    fn as_count(&self) -> Option<u64> {
        match self {
            Self::Number(n) => n.as_u64(),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Body for `POST /api/metrics/{owner}/{platform}`. All fields optional;
/// absent fields leave the stored values untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMetricsRequest {
    #[serde(default)]
    pub views: Option<CounterValue>,
    #[serde(default)]
    pub likes: Option<CounterValue>,
    #[serde(default)]
    pub shares: Option<CounterValue>,
    #[serde(default)]
    pub followers: Option<CounterValue>,
}

impl UpdateMetricsRequest {
    /// Parse every supplied field, rejecting anything that is not a
    /// non-negative integer or a string holding one.
    fn parse(&self) -> Result<CounterPatch, String> {
        Ok(CounterPatch {
            views: parse_field("views", &self.views)?,
            likes: parse_field("likes", &self.likes)?,
            shares: parse_field("shares", &self.shares)?,
            followers: parse_field("followers", &self.followers)?,
        })
    }
}

fn parse_field(name: &str, value: &Option<CounterValue>) -> Result<Option<u64>, String> {
    match value {
        None => Ok(None),
        Some(v) => match v.as_count() {
            Some(n) => Ok(Some(n)),
            None => Err(format!("{name} must be a non-negative integer")),
        },
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateMetricsResponse {
    pub success: bool,
    pub message: String,
    pub data: Counters,
}

// -- Handlers -----------------------------------------------------------------

/// `GET /api/health`
pub async fn health(State(s): State<Arc<AppState>>) -> impl IntoResponse {
    let youtube = s.youtube.as_ref().map(|yt| {
        if yt.authenticated() { "authenticated" } else { "not authenticated" }.to_owned()
    });
    Json(HealthResponse { status: "ok".to_owned(), timestamp: now_iso(), youtube })
}

/// `GET /api/metrics` — the full store document.
pub async fn get_all_metrics(State(s): State<Arc<AppState>>) -> impl IntoResponse {
    match s.store.load() {
        Ok(doc) => Json(doc).into_response(),
        Err(e) => store_error(e),
    }
}

/// `GET /api/metrics/{owner}/{platform}` — counters for one pair.
pub async fn get_platform_metrics(
    State(s): State<Arc<AppState>>,
    Path((owner, platform)): Path<(String, String)>,
) -> impl IntoResponse {
    let doc = match s.store.load() {
        Ok(d) => d,
        Err(e) => return store_error(e),
    };
    match doc.owners.get(&owner).and_then(|platforms| platforms.get(&platform)) {
        Some(counters) => Json(counters.clone()).into_response(),
        None => ApiError::NotFound
            .to_http_response(format!("no metrics for {owner}/{platform}"))
            .into_response(),
    }
}

/// `POST /api/metrics/{owner}/{platform}` — overwrite the supplied counters,
/// creating the owner/platform entry if missing.
pub async fn update_platform_metrics(
    State(s): State<Arc<AppState>>,
    Path((owner, platform)): Path<(String, String)>,
    Json(req): Json<UpdateMetricsRequest>,
) -> impl IntoResponse {
    let patch = match req.parse() {
        Ok(p) => p,
        Err(msg) => return ApiError::BadRequest.to_http_response(msg).into_response(),
    };

    let updated = s
        .store
        .update(|doc| {
            let counters =
                doc.owners.entry(owner.clone()).or_default().entry(platform.clone()).or_default();
            patch.apply_to(counters);
            counters.clone()
        })
        .await;

    match updated {
        Ok(counters) => {
            tracing::info!(owner = %owner, platform = %platform, "metrics updated");
            Json(UpdateMetricsResponse {
                success: true,
                message: format!("Updated {owner}/{platform}"),
                data: counters,
            })
            .into_response()
        }
        Err(e) => store_error(e),
    }
}

/// Convert a store failure into its HTTP response.
pub(crate) fn store_error(e: StoreError) -> axum::response::Response {
    let code = match &e {
        StoreError::Unreadable(_) => ApiError::StoreUnreadable,
        StoreError::Unwritable(_) => ApiError::StoreUnwritable,
    };
    tracing::error!(err = %e, "store operation failed");
    code.to_http_response(e.to_string()).into_response()
}
