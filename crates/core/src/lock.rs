// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock records and the handles returned to callers
//!
//! A [`LockRecord`] is the ownership state of one named resource as published
//! in the store. A [`Lock`] is a record bound to the coordinator that handed
//! it out, so that releasing it goes back through that coordinator's
//! ownership check.

use crate::clock::Clock;
use crate::coordinator::LockCoordinator;
use crate::identity::{ExecutionContext, ExecutionId, IdentitySource, InstanceId, LockToken};
use crate::store::{LockStore, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ownership state of one named resource
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    pub name: String,
    pub token: LockToken,
    pub owner_execution_id: ExecutionId,
    pub owner_instance_id: InstanceId,
    pub locked: bool,
    pub acquired_at: DateTime<Utc>,
}

impl LockRecord {
    /// A held record for a fresh acquisition
    pub fn acquired(
        name: impl Into<String>,
        token: LockToken,
        execution: ExecutionId,
        instance: InstanceId,
    ) -> Self {
        Self {
            name: name.into(),
            token,
            owner_execution_id: execution,
            owner_instance_id: instance,
            locked: true,
            acquired_at: Utc::now(),
        }
    }

    /// True only while held, and only for the exact owner pair
    pub fn is_owned_by(&self, execution: ExecutionId, instance: InstanceId) -> bool {
        self.locked && self.owner_execution_id == execution && self.owner_instance_id == instance
    }

    /// Observe this record from the point of view of one caller
    pub fn ownership(&self, execution: ExecutionId, instance: InstanceId) -> Ownership {
        if !self.locked {
            Ownership::Unbound
        } else if self.is_owned_by(execution, instance) {
            Ownership::HeldBySelf
        } else {
            Ownership::HeldByOther
        }
    }
}

impl fmt::Display for LockRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} token={} owner={}/{} since {}",
            self.name,
            if self.locked { "locked" } else { "unlocked" },
            self.token,
            self.owner_instance_id,
            self.owner_execution_id,
            self.acquired_at.format("%Y-%m-%dT%H:%M:%SZ"),
        )
    }
}

/// Ownership of a named lock as seen by one caller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ownership {
    /// No record, or a record that is no longer held
    Unbound,
    /// Held with the caller's execution and instance identity
    HeldBySelf,
    /// Held by another thread or another process
    HeldByOther,
}

/// A lock record bound to the coordinator that returned it
pub struct Lock<S, I, C>
where
    S: LockStore,
    I: IdentitySource,
    C: Clock,
{
    record: LockRecord,
    coordinator: LockCoordinator<S, I, C>,
}

impl<S, I, C> Lock<S, I, C>
where
    S: LockStore,
    I: IdentitySource,
    C: Clock,
{
    pub(crate) fn bind(record: LockRecord, coordinator: LockCoordinator<S, I, C>) -> Self {
        Self {
            record,
            coordinator,
        }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn token(&self) -> LockToken {
        self.record.token
    }

    pub fn record(&self) -> &LockRecord {
        &self.record
    }

    pub fn into_record(self) -> LockRecord {
        self.record
    }

    pub fn is_locked(&self) -> bool {
        self.record.locked
    }

    /// Whether `ctx` on the bound coordinator owns this lock
    pub fn is_owned_by(&self, ctx: &ExecutionContext) -> bool {
        self.record
            .is_owned_by(ctx.execution_id(), self.coordinator.instance_id())
    }

    pub fn ownership(&self, ctx: &ExecutionContext) -> Ownership {
        self.record
            .ownership(ctx.execution_id(), self.coordinator.instance_id())
    }

    /// Release the lock if `ctx` owns it
    ///
    /// Returns `Ok(false)` without touching the store when `ctx` is not the
    /// owner or the lock was already released.
    pub fn unlock(&mut self, ctx: &ExecutionContext) -> Result<bool, StoreError> {
        self.coordinator.release(&mut self.record, ctx)
    }
}

impl<S, I, C> fmt::Debug for Lock<S, I, C>
where
    S: LockStore,
    I: IdentitySource,
    C: Clock,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lock")
            .field("record", &self.record)
            .field("instance_id", &self.coordinator.instance_id())
            .finish()
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
