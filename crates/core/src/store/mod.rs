// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Replicated lock store interface
//!
//! The store maps lock names to [`LockRecord`]s and is shared by every
//! cooperating coordinator. Writes are unconditional overwrites; nothing here
//! assumes compare-and-swap. Entry expiry, if any, is the store's own policy.

mod memory;

pub use memory::{MemoryLockStore, StoreStats};

use crate::lock::LockRecord;
use std::sync::Arc;
use thiserror::Error;

/// Errors talking to a lock store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("lock store unavailable: {0}")]
    Unavailable(String),
    #[error("lock store IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("lock store codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Shared name -> record mapping consumed by the coordinator
pub trait LockStore: Send + Sync {
    /// Current record for `name`, if any
    fn get(&self, name: &str) -> Result<Option<LockRecord>, StoreError>;

    /// Create or overwrite the record for `name`
    fn put(&self, name: &str, record: &LockRecord) -> Result<(), StoreError>;

    /// Delete the record for `name`; absent entries are not an error
    fn remove(&self, name: &str) -> Result<(), StoreError>;

    /// Snapshot of every live record
    fn entries(&self) -> Result<Vec<LockRecord>, StoreError>;
}

impl<S: LockStore + ?Sized> LockStore for Arc<S> {
    fn get(&self, name: &str) -> Result<Option<LockRecord>, StoreError> {
        (**self).get(name)
    }

    fn put(&self, name: &str, record: &LockRecord) -> Result<(), StoreError> {
        (**self).put(name, record)
    }

    fn remove(&self, name: &str) -> Result<(), StoreError> {
        (**self).remove(name)
    }

    fn entries(&self) -> Result<Vec<LockRecord>, StoreError> {
        (**self).entries()
    }
}
