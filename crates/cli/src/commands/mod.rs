// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod exec;
pub mod status;

use crate::output::OutputFormat;
use anyhow::Context;
use lk_core::{CoordinatorConfig, LockCoordinator};
use lk_storage::FileLockStore;
use std::path::PathBuf;
use std::time::Duration;

/// Settings shared by every command
pub struct Settings {
    pub store_dir: PathBuf,
    pub config: CoordinatorConfig,
    pub ttl: Option<Duration>,
    pub format: OutputFormat,
}

impl Settings {
    /// Open the lock directory and build a coordinator over it
    pub fn coordinator(&self) -> anyhow::Result<LockCoordinator<FileLockStore>> {
        let mut store = FileLockStore::open(&self.store_dir)
            .with_context(|| format!("cannot open lock store {}", self.store_dir.display()))?;
        if let Some(ttl) = self.ttl {
            store = store.with_ttl(ttl);
        }
        Ok(LockCoordinator::new(store, self.config.clone())?)
    }
}
