// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the lock coordinator

use crate::config::ConfigError;
use crate::identity::IdentityError;
use crate::store::StoreError;
use thiserror::Error;

/// Errors from coordinator construction and lock operations
///
/// Releasing a lock that is not owned and looking up an absent lock without
/// `create` are not errors; they are reported through return values.
#[derive(Debug, Error)]
pub enum LockError {
    /// No secure randomness available
    #[error("identity source failed: {0}")]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid lock name: {0:?}")]
    InvalidName(String),

    /// `wait_for_lock` exhausted its attempts without becoming owner
    #[error("timed out waiting for lock '{name}' after {attempts} attempts")]
    Timeout { name: String, attempts: u32 },

    /// The lock store failed; passed through unchanged
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LockError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, LockError::Timeout { .. })
    }
}
