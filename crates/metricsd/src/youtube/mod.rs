// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! YouTube integration: OAuth2 authorization-code flow against Google plus a
//! thin Data-API client for channel statistics.
//!
//! Activated only when OAuth client credentials are configured; every
//! endpoint that needs the layer answers 400 without them.

pub mod client;
pub mod oauth;
pub mod token;

use serde::{Deserialize, Serialize};

/// OAuth client credentials for the YouTube integration.
#[derive(Debug, Clone)]
pub struct OauthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Provider endpoints. Defaults point at Google; tests aim them at a stub.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub auth_url: String,
    pub token_url: String,
    pub api_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_owned(),
            token_url: "https://oauth2.googleapis.com/token".to_owned(),
            api_base: "https://www.googleapis.com".to_owned(),
        }
    }
}

/// Owner-to-channel-handle table loaded from `--channel-config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelTable {
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

/// One owner's channel mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Store owner the fetched counters merge into.
    pub owner: String,
    /// Free-text channel handle to search for (e.g. "@mychannel").
    pub handle: String,
}

impl ChannelTable {
    pub fn handle_for(&self, owner: &str) -> Option<&str> {
        self.channels.iter().find(|c| c.owner == owner).map(|c| c.handle.as_str())
    }
}

/// Failures from the provider-facing call path.
#[derive(Debug, thiserror::Error)]
pub enum YoutubeError {
    #[error("not authenticated with youtube")]
    NotAuthenticated,
    #[error("no channel found for {0}")]
    ChannelNotFound(String),
    #[error("youtube api error: {0:#}")]
    Upstream(anyhow::Error),
}
