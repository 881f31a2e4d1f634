// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! lk-core: Named lock coordination over a shared key-value store
//!
//! This crate provides:
//! - Identity sources for instance, execution and per-acquisition identities
//! - Lock records and the ownership predicate
//! - The lock coordinator (lookup, blocking wait with backoff, ownership-gated release)
//! - The lock store interface and an in-memory implementation
//!
//! There is no cross-process atomicity here: coordinators in different
//! processes publish with last-writer-wins semantics. See [`coordinator`].

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod clock;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod identity;
pub mod lock;
pub mod store;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{BackoffConfig, ConfigError, CoordinatorConfig};
pub use coordinator::LockCoordinator;
pub use error::LockError;
pub use identity::{
    ExecutionContext, ExecutionId, IdentityError, IdentitySource, InstanceId, LockToken,
    OsIdentitySource, SequentialIdentitySource,
};
pub use lock::{Lock, LockRecord, Ownership};
pub use store::{LockStore, MemoryLockStore, StoreError, StoreStats};
