// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity generation for lock ownership
//!
//! Three kinds of 64-bit identity prove who holds a lock:
//! - [`InstanceId`] - one per coordinator, drawn at construction
//! - [`ExecutionId`] - one per thread of control, carried in an [`ExecutionContext`]
//! - [`LockToken`] - one per acquisition, distinguishes successive holds of a name

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Errors produced by an [`IdentitySource`]
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("secure random source unavailable: {0}")]
    Unavailable(String),
}

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:016x}", self.0)
            }
        }
    };
}

id_newtype!(
    /// Identity of one coordinator (one process)
    InstanceId
);
id_newtype!(
    /// Identity of one thread of control
    ExecutionId
);
id_newtype!(
    /// Per-acquisition value, never reused for a name while a hold is live
    LockToken
);

/// Generates unique 64-bit identities
pub trait IdentitySource: Clone + Send + Sync {
    fn next_id(&self) -> Result<i64, IdentityError>;
}

/// Operating-system CSPRNG backed source for production use
#[derive(Clone, Copy, Debug, Default)]
pub struct OsIdentitySource;

impl IdentitySource for OsIdentitySource {
    fn next_id(&self) -> Result<i64, IdentityError> {
        let mut bytes = [0u8; 8];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;
        Ok(i64::from_le_bytes(bytes))
    }
}

/// Sequential source for testing
///
/// Clones share the counter, so two coordinators built from clones of the
/// same source never hand out the same value.
#[derive(Clone, Debug)]
pub struct SequentialIdentitySource {
    counter: Arc<AtomicI64>,
}

impl SequentialIdentitySource {
    pub fn new(start: i64) -> Self {
        Self {
            counter: Arc::new(AtomicI64::new(start)),
        }
    }
}

impl Default for SequentialIdentitySource {
    fn default() -> Self {
        Self::new(1)
    }
}

impl IdentitySource for SequentialIdentitySource {
    fn next_id(&self) -> Result<i64, IdentityError> {
        Ok(self.counter.fetch_add(1, Ordering::SeqCst))
    }
}

/// Draw a fresh instance identity
pub fn new_instance_id(source: &impl IdentitySource) -> Result<InstanceId, IdentityError> {
    source.next_id().map(InstanceId)
}

thread_local! {
    static THREAD_EXECUTION_ID: Cell<Option<ExecutionId>> = const { Cell::new(None) };
}

/// The caller identity presented to every coordinator operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExecutionContext {
    execution_id: ExecutionId,
}

impl ExecutionContext {
    pub fn new(execution_id: ExecutionId) -> Self {
        Self { execution_id }
    }

    /// Build a context with a freshly drawn identity
    pub fn generate(source: &impl IdentitySource) -> Result<Self, IdentityError> {
        source.next_id().map(|id| Self::new(ExecutionId(id)))
    }

    /// Context for the calling thread
    ///
    /// The identity is drawn from the OS source on first use and cached for
    /// the lifetime of the thread.
    pub fn current() -> Result<Self, IdentityError> {
        THREAD_EXECUTION_ID.with(|slot| {
            if let Some(id) = slot.get() {
                return Ok(Self::new(id));
            }
            let id = ExecutionId(OsIdentitySource.next_id()?);
            slot.set(Some(id));
            Ok(Self::new(id))
        })
    }

    pub fn execution_id(&self) -> ExecutionId {
        self.execution_id
    }
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
