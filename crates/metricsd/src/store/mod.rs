// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The metrics document: owners, platforms, and engagement counters.

pub mod persist;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Engagement counters for one owner/platform pair.
///
/// Fields stay absent until first written; the seed omits `shares` for
/// platforms that have no share mechanic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<u64>,
}

/// Platforms tracked for one owner, in insertion order.
pub type PlatformMap = IndexMap<String, Counters>;

/// The on-disk metrics document.
///
/// Owner keys sit at the top level with `lastUpdated` as a sibling, matching
/// the wire format clients already read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsDocument {
    #[serde(flatten)]
    pub owners: IndexMap<String, PlatformMap>,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

/// A parsed set of counter overwrites from an update request.
///
/// Each present field overwrites the stored value; absent fields leave the
/// stored value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterPatch {
    pub views: Option<u64>,
    pub likes: Option<u64>,
    pub shares: Option<u64>,
    pub followers: Option<u64>,
}

impl CounterPatch {
    pub fn apply_to(&self, counters: &mut Counters) {
        if let Some(v) = self.views {
            counters.views = Some(v);
        }
        if let Some(v) = self.likes {
            counters.likes = Some(v);
        }
        if let Some(v) = self.shares {
            counters.shares = Some(v);
        }
        if let Some(v) = self.followers {
            counters.followers = Some(v);
        }
    }
}

/// Default document written on first run.
pub fn seed_document(now: String) -> MetricsDocument {
    let full = Counters {
        views: Some(0),
        likes: Some(0),
        shares: Some(0),
        followers: Some(0),
    };
    // x and threads carry no share counter.
    let no_shares = Counters { shares: None, ..full.clone() };

    let mut personal = PlatformMap::new();
    personal.insert("instagram".to_owned(), full.clone());
    personal.insert("youtube".to_owned(), full.clone());

    let mut studio = PlatformMap::new();
    studio.insert("instagram".to_owned(), full.clone());
    studio.insert("tiktok".to_owned(), full.clone());
    studio.insert("youtube".to_owned(), full);
    studio.insert("x".to_owned(), no_shares.clone());
    studio.insert("threads".to_owned(), no_shares);

    let mut owners = IndexMap::new();
    owners.insert("personal".to_owned(), personal);
    owners.insert("studio".to_owned(), studio);

    MetricsDocument { owners, last_updated: now }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
