// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory-backed lock store
//!
//! Each lock lives in `<dir>/<sha256(name)>.json`. Writes go to a temp file
//! that is renamed over the target, so readers never observe a torn record.
//! The rename is a plain overwrite: the last writer wins.
//!
//! Readers never delete: an expired entry is reported as absent and stays on
//! disk until the next `put` replaces it or `remove` deletes it.

use chrono::Utc;
use lk_core::{LockRecord, LockStore, StoreError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

const ENTRY_EXTENSION: &str = "json";

/// On-disk envelope around a record
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    record: LockRecord,
    /// Unix millis of the last publication, used for expiry
    published_at_ms: i64,
}

/// Lock store shared through a directory
#[derive(Clone, Debug)]
pub struct FileLockStore {
    dir: PathBuf,
    ttl: Option<Duration>,
}

impl FileLockStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, ttl: None })
    }

    /// Treat entries older than `ttl` as absent
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        let digest = hasher.finalize();
        self.dir
            .join(format!("{}.{}", hex_encode(&digest), ENTRY_EXTENSION))
    }

    fn is_expired(&self, entry: &StoredEntry) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };
        let age_ms = Utc::now().timestamp_millis() - entry.published_at_ms;
        age_ms >= i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
    }

    /// Read one entry, hiding it if expired
    fn read_entry(&self, path: &Path) -> Result<Option<StoredEntry>, StoreError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let entry: StoredEntry = serde_json::from_str(&content)?;

        if self.is_expired(&entry) {
            tracing::debug!(lock = %entry.record.name, "ignoring expired lock entry");
            return Ok(None);
        }
        Ok(Some(entry))
    }
}

impl LockStore for FileLockStore {
    fn get(&self, name: &str) -> Result<Option<LockRecord>, StoreError> {
        Ok(self
            .read_entry(&self.entry_path(name))?
            .map(|entry| entry.record))
    }

    fn put(&self, name: &str, record: &LockRecord) -> Result<(), StoreError> {
        let entry = StoredEntry {
            record: record.clone(),
            published_at_ms: Utc::now().timestamp_millis(),
        };
        let target = self.entry_path(name);
        let temp_path = temp_path_for(&target);
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(serde_json::to_string_pretty(&entry)?.as_bytes())?;
            file.sync_all()?;
        }

        // Atomic replace (rename is atomic on POSIX)
        if let Err(e) = fs::rename(&temp_path, &target) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), StoreError> {
        remove_if_present(&self.entry_path(name))
    }

    fn entries(&self) -> Result<Vec<LockRecord>, StoreError> {
        let mut records = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION) {
                if let Some(entry) = self.read_entry(&path)? {
                    records.push(entry.record);
                }
            }
        }
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }
}

fn remove_if_present(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Unique sibling of `target` for staging a write
fn temp_path_for(target: &Path) -> PathBuf {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    target.with_extension(format!("{}.{}.tmp", std::process::id(), n))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
