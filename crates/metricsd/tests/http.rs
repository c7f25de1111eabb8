// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for the metrics HTTP API.
//!
//! Uses `axum_test::TestServer` — no real TCP needed.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use tempfile::TempDir;

use metricsd::state::AppState;
use metricsd::store::persist::MetricsFile;
use metricsd::transport::build_router;

const SEED_TS: &str = "2020-01-01T00:00:00.000Z";

fn seeded_store(dir: &TempDir) -> MetricsFile {
    let store = MetricsFile::new(dir.path().join("metrics.json"));
    store.ensure_seeded(SEED_TS).expect("seed store");
    store
}

fn test_server(store: MetricsFile) -> TestServer {
    let state = Arc::new(AppState { store, youtube: None });
    TestServer::new(build_router(state)).expect("failed to create test server")
}

#[tokio::test]
async fn fresh_store_serves_seed_defaults() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let server = test_server(seeded_store(&dir));

    let resp = server.get("/api/metrics").await;
    resp.assert_status_ok();

    let body: serde_json::Value = resp.json();
    assert_eq!(body["lastUpdated"], SEED_TS);
    for platform in ["instagram", "youtube"] {
        assert_eq!(body["personal"][platform]["views"], 0);
        assert_eq!(body["personal"][platform]["followers"], 0);
    }
    for platform in ["instagram", "tiktok", "youtube", "x", "threads"] {
        assert_eq!(body["studio"][platform]["likes"], 0);
    }
    // x and threads carry no share counter in the seed.
    assert!(body["studio"]["x"].get("shares").is_none());
    assert!(body["studio"]["threads"].get("shares").is_none());
    Ok(())
}

#[tokio::test]
async fn reads_are_idempotent() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let server = test_server(seeded_store(&dir));

    let first = server.get("/api/metrics").await.text();
    let second = server.get("/api/metrics").await.text();
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn get_pair_returns_counters() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let server = test_server(seeded_store(&dir));

    let resp = server.get("/api/metrics/personal/instagram").await;
    resp.assert_status_ok();

    let body: serde_json::Value = resp.json();
    assert_eq!(body["views"], 0);
    assert_eq!(body["likes"], 0);
    assert_eq!(body["shares"], 0);
    assert_eq!(body["followers"], 0);
    Ok(())
}

#[tokio::test]
async fn get_unknown_pair_returns_404_without_writing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = seeded_store(&dir);
    let before = std::fs::read_to_string(store.path())?;
    let path = store.path().to_path_buf();
    let server = test_server(store);

    for target in ["/api/metrics/personal/myspace", "/api/metrics/nobody/instagram"] {
        let resp = server.get(target).await;
        resp.assert_status(StatusCode::NOT_FOUND);
        let body: serde_json::Value = resp.json();
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    let after = std::fs::read_to_string(path)?;
    assert_eq!(before, after, "a failed read must not touch the store");
    Ok(())
}

#[tokio::test]
async fn post_creates_unknown_pair_with_supplied_fields_only() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let server = test_server(seeded_store(&dir));

    let resp = server
        .post("/api/metrics/label/soundcloud")
        .json(&serde_json::json!({ "views": 10, "followers": 3 }))
        .await;
    resp.assert_status_ok();

    let body: serde_json::Value = resp.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Updated label/soundcloud");
    assert_eq!(body["data"]["views"], 10);
    assert_eq!(body["data"]["followers"], 3);
    assert!(body["data"].get("likes").is_none());
    assert!(body["data"].get("shares").is_none());

    let read: serde_json::Value = server.get("/api/metrics/label/soundcloud").await.json();
    assert_eq!(read["views"], 10);
    assert!(read.get("likes").is_none());
    Ok(())
}

#[tokio::test]
async fn post_subset_leaves_other_fields_unchanged() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let server = test_server(seeded_store(&dir));

    server
        .post("/api/metrics/personal/instagram")
        .json(&serde_json::json!({ "views": 100, "likes": 50 }))
        .await
        .assert_status_ok();

    let resp = server
        .post("/api/metrics/personal/instagram")
        .json(&serde_json::json!({ "likes": 51 }))
        .await;
    resp.assert_status_ok();

    let read: serde_json::Value = server.get("/api/metrics/personal/instagram").await.json();
    assert_eq!(read["views"], 100, "unmentioned field must keep its value");
    assert_eq!(read["likes"], 51);
    assert_eq!(read["shares"], 0, "seeded field must survive");
    Ok(())
}

#[tokio::test]
async fn numeric_strings_are_coerced() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let server = test_server(seeded_store(&dir));

    let resp = server
        .post("/api/metrics/studio/tiktok")
        .json(&serde_json::json!({ "views": "1234", "followers": " 56 " }))
        .await;
    resp.assert_status_ok();

    let read: serde_json::Value = server.get("/api/metrics/studio/tiktok").await.json();
    assert_eq!(read["views"], 1234);
    assert_eq!(read["followers"], 56);
    Ok(())
}

#[tokio::test]
async fn non_numeric_values_are_rejected_without_writing() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = seeded_store(&dir);
    let before = std::fs::read_to_string(store.path())?;
    let path = store.path().to_path_buf();
    let server = test_server(store);

    for bad in [
        serde_json::json!({ "views": "a lot" }),
        serde_json::json!({ "likes": -5 }),
        serde_json::json!({ "followers": 1.5 }),
    ] {
        let resp = server.post("/api/metrics/personal/instagram").json(&bad).await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = resp.json();
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    let after = std::fs::read_to_string(path)?;
    assert_eq!(before, after, "rejected input must not touch the store");
    Ok(())
}

#[tokio::test]
async fn empty_body_still_bumps_last_updated() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let server = test_server(seeded_store(&dir));

    let resp = server.post("/api/metrics/personal/youtube").json(&serde_json::json!({})).await;
    resp.assert_status_ok();

    let body: serde_json::Value = server.get("/api/metrics").await.json();
    let stamped = body["lastUpdated"].as_str().unwrap_or_default();
    assert_ne!(stamped, SEED_TS);
    // Same RFC 3339 shape, so string order is time order.
    assert!(stamped > SEED_TS);
    Ok(())
}

#[tokio::test]
async fn last_updated_moves_forward_on_each_write() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let server = test_server(seeded_store(&dir));

    server
        .post("/api/metrics/personal/instagram")
        .json(&serde_json::json!({ "views": 1 }))
        .await
        .assert_status_ok();
    let first: serde_json::Value = server.get("/api/metrics").await.json();

    server
        .post("/api/metrics/personal/instagram")
        .json(&serde_json::json!({ "views": 2 }))
        .await
        .assert_status_ok();
    let second: serde_json::Value = server.get("/api/metrics").await.json();

    let t1 = first["lastUpdated"].as_str().unwrap_or_default();
    let t2 = second["lastUpdated"].as_str().unwrap_or_default();
    assert!(t2 >= t1, "lastUpdated must never move backwards ({t1} -> {t2})");
    Ok(())
}

#[tokio::test]
async fn health_without_youtube_omits_the_field() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let server = test_server(seeded_store(&dir));

    let resp = server.get("/api/health").await;
    resp.assert_status_ok();

    let body: serde_json::Value = resp.json();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
    assert!(body.get("youtube").is_none());
    Ok(())
}

#[tokio::test]
async fn youtube_endpoints_without_config_return_400() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let server = test_server(seeded_store(&dir));

    let authorize = server.get("/oauth/youtube/authorize").await;
    authorize.assert_status(StatusCode::BAD_REQUEST);

    let sync = server.post("/api/youtube/sync/personal").await;
    sync.assert_status(StatusCode::BAD_REQUEST);

    let sync_all = server.post("/api/youtube/sync").await;
    sync_all.assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn seeding_is_idempotent() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = seeded_store(&dir);

    store
        .update(|doc| {
            if let Some(ig) = doc.owners.get_mut("personal").and_then(|p| p.get_mut("instagram")) {
                ig.views = Some(777);
            }
        })
        .await?;

    // A second ensure_seeded must never overwrite live data.
    let seeded = store.ensure_seeded(SEED_TS)?;
    assert!(!seeded);

    let doc = store.load()?;
    assert_eq!(doc.owners["personal"]["instagram"].views, Some(777));
    Ok(())
}
