// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::youtube::OauthConfig;

/// Configuration for the metrics API server.
#[derive(Debug, Clone, clap::Parser)]
pub struct Config {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "METRICS_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 3001, env = "METRICS_PORT")]
    pub port: u16,

    /// Path to the metrics store JSON file.
    #[arg(long, default_value = "artifacts/metrics.json", env = "METRICS_FILE")]
    pub metrics_file: std::path::PathBuf,

    /// Path to the persisted YouTube token file.
    #[arg(long, default_value = "artifacts/youtube-auth.json", env = "YOUTUBE_TOKEN_FILE")]
    pub token_file: std::path::PathBuf,

    /// OAuth client id for the YouTube integration.
    #[arg(long, env = "YOUTUBE_CLIENT_ID")]
    pub youtube_client_id: Option<String>,

    /// OAuth client secret for the YouTube integration.
    #[arg(long, env = "YOUTUBE_CLIENT_SECRET")]
    pub youtube_client_secret: Option<String>,

    /// Redirect URI registered with the OAuth provider.
    #[arg(long, env = "YOUTUBE_REDIRECT_URI")]
    pub youtube_redirect_uri: Option<String>,

    /// Path to the owner-to-channel-handle table JSON file.
    #[arg(long, env = "YOUTUBE_CHANNEL_CONFIG")]
    pub channel_config: Option<std::path::PathBuf>,
}

impl Config {
    /// OAuth client credentials, when all three are configured.
    ///
    /// The YouTube layer activates only with a complete set; a partial set is
    /// treated the same as none.
    pub fn oauth_credentials(&self) -> Option<OauthConfig> {
        match (&self.youtube_client_id, &self.youtube_client_secret, &self.youtube_redirect_uri) {
            (Some(id), Some(secret), Some(redirect)) => Some(OauthConfig {
                client_id: id.clone(),
                client_secret: secret.clone(),
                redirect_uri: redirect.clone(),
            }),
            _ => None,
        }
    }
}
