// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted token pair: load/save to JSON file with atomic writes.
//!
//! Absence of the file is the signal "not authenticated".

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::youtube::oauth::TokenResponse;

/// Refresh this long before the recorded expiry.
const REFRESH_SKEW_SECS: u64 = 60;

/// Persisted token state for the YouTube integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Expiry as epoch seconds. Zero means no known expiry.
    #[serde(default)]
    pub expires_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl StoredToken {
    /// Build from a token-endpoint response received at `now`.
    pub fn from_response(resp: TokenResponse, now: u64) -> Self {
        let expires_at = if resp.expires_in == 0 { 0 } else { now + resp.expires_in };
        Self {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token,
            expires_at,
            scope: resp.scope,
            token_type: resp.token_type,
        }
    }

    /// Whether the access token is expired or about to be.
    pub fn needs_refresh(&self, now: u64) -> bool {
        self.expires_at != 0 && now + REFRESH_SKEW_SECS >= self.expires_at
    }
}

/// Load the persisted token from a JSON file.
pub fn load(path: &Path) -> anyhow::Result<StoredToken> {
    let contents = std::fs::read_to_string(path)?;
    let token: StoredToken = serde_json::from_str(&contents)?;
    Ok(token)
}

/// Save the token to a JSON file atomically (write tmp + rename), creating
/// parent directories as needed.
pub fn save(path: &Path, token: &StoredToken) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(token)?;
    let tmp_name = format!(
        "{}.{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy(),
        std::process::id(),
    );
    let tmp_path = path.with_file_name(tmp_name);
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Return current epoch seconds.
pub fn epoch_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
