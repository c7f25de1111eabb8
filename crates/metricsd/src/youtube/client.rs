// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client for the YouTube Data API, with transparent token refresh.

use std::path::PathBuf;

use crate::store::Counters;
use crate::youtube::token::{self, StoredToken};
use crate::youtube::{oauth, ChannelTable, Endpoints, OauthConfig, YoutubeError};

/// The configured YouTube layer: OAuth credentials, provider endpoints, the
/// token file, and the owner-to-handle table.
pub struct YoutubeService {
    oauth: OauthConfig,
    endpoints: Endpoints,
    token_file: PathBuf,
    channels: ChannelTable,
    client: reqwest::Client,
}

impl YoutubeService {
    pub fn new(
        oauth: OauthConfig,
        endpoints: Endpoints,
        token_file: PathBuf,
        channels: ChannelTable,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { oauth, endpoints, token_file, channels, client }
    }

    pub fn channels(&self) -> &ChannelTable {
        &self.channels
    }

    /// Whether a token pair has been persisted.
    pub fn authenticated(&self) -> bool {
        self.token_file.exists()
    }

    /// The consent URL to redirect the user's browser to.
    pub fn authorize_url(&self) -> String {
        oauth::build_auth_url(
            &self.endpoints.auth_url,
            &self.oauth.client_id,
            &self.oauth.redirect_uri,
            oauth::SCOPES,
        )
    }

    /// Exchange an authorization code and persist the resulting token pair.
    ///
    /// The token file is only written on a successful exchange.
    pub async fn complete_authorization(&self, code: &str) -> anyhow::Result<()> {
        let resp = oauth::exchange_code(
            &self.client,
            &self.endpoints.token_url,
            &self.oauth.client_id,
            &self.oauth.client_secret,
            code,
            &self.oauth.redirect_uri,
        )
        .await?;
        let stored = StoredToken::from_response(resp, token::epoch_secs());
        token::save(&self.token_file, &stored)?;
        Ok(())
    }

    /// Load the persisted token, refreshing it through the token endpoint if
    /// it is at or past expiry. The rotated token is persisted before use.
    async fn fresh_access_token(&self) -> Result<String, YoutubeError> {
        if !self.token_file.exists() {
            return Err(YoutubeError::NotAuthenticated);
        }
        let mut stored = token::load(&self.token_file).map_err(YoutubeError::Upstream)?;

        let now = token::epoch_secs();
        if stored.needs_refresh(now) {
            let Some(refresh_token) = stored.refresh_token.clone() else {
                // Expired with nothing to refresh with: back to the consent flow.
                return Err(YoutubeError::NotAuthenticated);
            };
            let resp = oauth::do_refresh(
                &self.client,
                &self.endpoints.token_url,
                &self.oauth.client_id,
                &self.oauth.client_secret,
                &refresh_token,
            )
            .await
            .map_err(YoutubeError::Upstream)?;

            let mut rotated = StoredToken::from_response(resp, now);
            // Google omits the refresh token on refresh responses; keep the old one.
            if rotated.refresh_token.is_none() {
                rotated.refresh_token = Some(refresh_token);
            }
            token::save(&self.token_file, &rotated).map_err(YoutubeError::Upstream)?;
            tracing::debug!("refreshed youtube access token");
            stored = rotated;
        }

        Ok(stored.access_token)
    }

    /// Fetch public channel statistics for a free-text handle and map them
    /// into the counters shape. Likes and shares are not exposed at the
    /// channel level and come back as zero.
    pub async fn fetch_channel_metrics(&self, handle: &str) -> Result<Counters, YoutubeError> {
        let access_token = self.fresh_access_token().await?;
        let channel_id = self.search_channel(&access_token, handle).await?;
        let stats = self.channel_statistics(&access_token, &channel_id).await?;

        Ok(Counters {
            views: Some(stat_count(&stats["viewCount"])),
            likes: Some(0),
            shares: Some(0),
            followers: Some(stat_count(&stats["subscriberCount"])),
        })
    }

    /// Search the provider for a channel matching `handle`; first result wins.
    async fn search_channel(
        &self,
        access_token: &str,
        handle: &str,
    ) -> Result<String, YoutubeError> {
        let fetch = async {
            let resp = self
                .client
                .get(format!("{}/youtube/v3/search", self.endpoints.api_base))
                .query(&[
                    ("part", "snippet"),
                    ("type", "channel"),
                    ("maxResults", "1"),
                    ("q", handle),
                ])
                .bearer_auth(access_token)
                .send()
                .await?;
            let value: serde_json::Value = resp.error_for_status()?.json().await?;
            anyhow::Ok(value)
        };
        let value = fetch.await.map_err(YoutubeError::Upstream)?;

        value["items"]
            .get(0)
            .and_then(|item| item["id"]["channelId"].as_str())
            .map(str::to_owned)
            .ok_or_else(|| YoutubeError::ChannelNotFound(handle.to_owned()))
    }

    /// Fetch the statistics block for a channel id.
    async fn channel_statistics(
        &self,
        access_token: &str,
        channel_id: &str,
    ) -> Result<serde_json::Value, YoutubeError> {
        let fetch = async {
            let resp = self
                .client
                .get(format!("{}/youtube/v3/channels", self.endpoints.api_base))
                .query(&[("part", "statistics"), ("id", channel_id)])
                .bearer_auth(access_token)
                .send()
                .await?;
            let value: serde_json::Value = resp.error_for_status()?.json().await?;
            anyhow::Ok(value)
        };
        let value = fetch.await.map_err(YoutubeError::Upstream)?;

        match value["items"].get(0) {
            Some(item) => Ok(item["statistics"].clone()),
            None => Err(YoutubeError::Upstream(anyhow::anyhow!(
                "statistics missing for channel {channel_id}"
            ))),
        }
    }
}

/// The Data API serializes counts as decimal strings; accept bare numbers too.
fn stat_count(value: &serde_json::Value) -> u64 {
    value
        .as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| value.as_u64())
        .unwrap_or(0)
}
