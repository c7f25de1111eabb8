// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::store::persist::MetricsFile;
use crate::youtube::client::YoutubeService;

/// Shared application state.
pub struct AppState {
    pub store: MetricsFile,
    /// Present only when OAuth client credentials are configured.
    pub youtube: Option<YoutubeService>,
}

/// Current time as an RFC 3339 timestamp with millisecond precision.
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
