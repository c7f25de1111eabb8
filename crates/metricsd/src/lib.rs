// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Metricsd: file-backed social-media metrics API with optional YouTube sync.

pub mod config;
pub mod error;
pub mod state;
pub mod store;
pub mod transport;
pub mod youtube;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::state::AppState;
use crate::store::persist::MetricsFile;
use crate::transport::build_router;
use crate::youtube::client::YoutubeService;
use crate::youtube::{ChannelTable, Endpoints};

/// Run the metrics API server until shutdown.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let shutdown = CancellationToken::new();

    let store = MetricsFile::new(config.metrics_file.clone());
    if store.ensure_seeded(&state::now_iso())? {
        tracing::info!(path = %config.metrics_file.display(), "created metrics store with seed defaults");
    }

    let channels = match config.channel_config {
        Some(ref path) => {
            let contents = std::fs::read_to_string(path)?;
            serde_json::from_str::<ChannelTable>(&contents)?
        }
        None => ChannelTable::default(),
    };

    let youtube = config.oauth_credentials().map(|creds| {
        YoutubeService::new(creds, Endpoints::default(), config.token_file.clone(), channels)
    });

    if youtube.is_some() {
        tracing::info!("metricsd listening on {addr} (youtube sync enabled)");
    } else {
        tracing::info!("metricsd listening on {addr}");
    }

    // Ctrl-C drains in-flight requests before the process exits.
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        });
    }

    let state = Arc::new(AppState { store, youtube });
    let router = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    Ok(())
}
