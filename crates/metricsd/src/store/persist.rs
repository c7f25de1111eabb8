// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Metrics store persistence: load/save the JSON document with atomic writes.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::store::{seed_document, MetricsDocument};

/// Store failures, split by phase so handlers map them to the right code.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read metrics store: {0:#}")]
    Unreadable(anyhow::Error),
    #[error("failed to write metrics store: {0:#}")]
    Unwritable(anyhow::Error),
}

/// Handle to the on-disk metrics document.
///
/// Mutations serialize on `write_lock` across the whole read-modify-write
/// cycle, so two concurrent updates cannot clobber each other. Plain reads
/// skip the lock: saves replace the file atomically, so a read always sees a
/// complete document.
pub struct MetricsFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl MetricsFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path, write_lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole document.
    pub fn load(&self) -> Result<MetricsDocument, StoreError> {
        let read = || -> anyhow::Result<MetricsDocument> {
            let contents = std::fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&contents)?)
        };
        read().map_err(StoreError::Unreadable)
    }

    /// Serialize pretty-printed and atomically replace the file.
    pub fn save(&self, doc: &MetricsDocument) -> Result<(), StoreError> {
        self.write(doc).map_err(StoreError::Unwritable)
    }

    /// Write tmp + rename. Uses a unique temp filename (PID + counter) to
    /// avoid corruption when concurrent saves race on the same `.tmp` file —
    /// a shorter write can leave trailing bytes from a longer previous write.
    fn write(&self, doc: &MetricsDocument) -> anyhow::Result<()> {
        use std::sync::atomic::{AtomicU32, Ordering};
        static COUNTER: AtomicU32 = AtomicU32::new(0);

        let json = serde_json::to_string_pretty(doc)?;
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_name = format!(
            "{}.{}.{}.tmp",
            self.path.file_name().unwrap_or_default().to_string_lossy(),
            std::process::id(),
            seq,
        );
        let tmp_path = self.path.with_file_name(tmp_name);
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Create parent directories and write the seed document if the file does
    /// not exist yet. Never overwrites an existing file. Returns whether
    /// seeding happened.
    pub fn ensure_seeded(&self, now: &str) -> Result<bool, StoreError> {
        if self.path.exists() {
            return Ok(false);
        }
        let prepare = || -> anyhow::Result<()> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Ok(())
        };
        prepare().map_err(StoreError::Unwritable)?;
        self.save(&seed_document(now.to_owned()))?;
        Ok(true)
    }

    /// Run one locked read-modify-write cycle: load, apply `f`, stamp
    /// `lastUpdated`, save. Returns whatever `f` produced.
    ///
    /// `lastUpdated` is refreshed on every successful cycle, including one
    /// whose `f` changed nothing.
    pub async fn update<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut MetricsDocument) -> R,
    {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.load()?;
        let out = f(&mut doc);
        doc.last_updated = crate::state::now_iso();
        self.save(&doc)?;
        Ok(out)
    }
}
