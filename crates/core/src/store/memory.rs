// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory lock store
//!
//! Clones are handles onto the same map, so several coordinators built from
//! clones behave like separate processes attached to one replicated store.

use super::{LockStore, StoreError};
use crate::clock::{Clock, SystemClock};
use crate::lock::LockRecord;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Call counters for a [`MemoryLockStore`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub gets: u64,
    pub puts: u64,
    pub removes: u64,
    pub evictions: u64,
}

#[derive(Default)]
struct Counters {
    gets: AtomicU64,
    puts: AtomicU64,
    removes: AtomicU64,
    evictions: AtomicU64,
}

struct Entry {
    record: LockRecord,
    published_at: Instant,
}

struct Shared {
    entries: Mutex<HashMap<String, Entry>>,
    counters: Counters,
    unavailable: AtomicBool,
}

/// Shared in-memory store with optional entry expiry
#[derive(Clone)]
pub struct MemoryLockStore<C: Clock = SystemClock> {
    shared: Arc<Shared>,
    clock: C,
    ttl: Option<Duration>,
}

impl MemoryLockStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryLockStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryLockStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            shared: Arc::new(Shared {
                entries: Mutex::new(HashMap::new()),
                counters: Counters::default(),
                unavailable: AtomicBool::new(false),
            }),
            clock,
            ttl: None,
        }
    }

    /// Expire entries `ttl` after they were last published
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn stats(&self) -> StoreStats {
        let c = &self.shared.counters;
        StoreStats {
            gets: c.gets.load(Ordering::SeqCst),
            puts: c.puts.load(Ordering::SeqCst),
            removes: c.removes.load(Ordering::SeqCst),
            evictions: c.evictions.load(Ordering::SeqCst),
        }
    }

    pub fn len(&self) -> usize {
        let mut entries = self.lock_map();
        self.evict_expired(&mut entries);
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_map(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.shared
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.shared.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        self.ttl
            .is_some_and(|ttl| self.clock.now().duration_since(entry.published_at) >= ttl)
    }

    fn evict_expired(&self, entries: &mut HashMap<String, Entry>) {
        let before = entries.len();
        entries.retain(|_, entry| !self.is_expired(entry));
        let evicted = (before - entries.len()) as u64;
        if evicted > 0 {
            self.shared
                .counters
                .evictions
                .fetch_add(evicted, Ordering::SeqCst);
            tracing::debug!(evicted, "expired lock entries evicted");
        }
    }
}

impl<C: Clock> LockStore for MemoryLockStore<C> {
    fn get(&self, name: &str) -> Result<Option<LockRecord>, StoreError> {
        self.check_available()?;
        self.shared.counters.gets.fetch_add(1, Ordering::SeqCst);
        let mut entries = self.lock_map();
        self.evict_expired(&mut entries);
        Ok(entries.get(name).map(|entry| entry.record.clone()))
    }

    fn put(&self, name: &str, record: &LockRecord) -> Result<(), StoreError> {
        self.check_available()?;
        self.shared.counters.puts.fetch_add(1, Ordering::SeqCst);
        self.lock_map().insert(
            name.to_string(),
            Entry {
                record: record.clone(),
                published_at: self.clock.now(),
            },
        );
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), StoreError> {
        self.check_available()?;
        self.shared.counters.removes.fetch_add(1, Ordering::SeqCst);
        self.lock_map().remove(name);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<LockRecord>, StoreError> {
        self.check_available()?;
        let mut entries = self.lock_map();
        self.evict_expired(&mut entries);
        let mut records: Vec<_> = entries.values().map(|e| e.record.clone()).collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
