// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock coordinator
//!
//! Creates, looks up and releases named locks against a shared [`LockStore`].
//!
//! All record creation and release inside one coordinator runs under a single
//! critical section, so two threads of the same process never both believe
//! they just created a lock. That section does not reach other processes:
//! publication is a last-writer-wins `put`, and two coordinators racing on the
//! same name can both end up believing they hold it. Callers needing strict
//! cross-process exclusion need a store with compare-and-swap.

use crate::clock::{Clock, SystemClock};
use crate::config::CoordinatorConfig;
use crate::error::LockError;
use crate::identity::{
    new_instance_id, ExecutionContext, IdentitySource, InstanceId, LockToken, OsIdentitySource,
};
use crate::lock::{Lock, LockRecord, Ownership};
use crate::store::{LockStore, StoreError};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

struct Inner<S, I, C> {
    store: S,
    ids: I,
    clock: C,
    instance_id: InstanceId,
    config: CoordinatorConfig,
    critical: Mutex<()>,
}

/// Arbitrates named locks for one process
///
/// Cloning is cheap; clones share the instance identity and critical section.
pub struct LockCoordinator<S, I = OsIdentitySource, C = SystemClock>
where
    S: LockStore,
    I: IdentitySource,
    C: Clock,
{
    inner: Arc<Inner<S, I, C>>,
}

impl<S, I, C> Clone for LockCoordinator<S, I, C>
where
    S: LockStore,
    I: IdentitySource,
    C: Clock,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: LockStore> LockCoordinator<S> {
    /// Coordinator backed by the OS random source and the system clock
    pub fn new(store: S, config: CoordinatorConfig) -> Result<Self, LockError> {
        Self::with_parts(store, OsIdentitySource, SystemClock, config)
    }
}

impl<S, I, C> LockCoordinator<S, I, C>
where
    S: LockStore,
    I: IdentitySource,
    C: Clock,
{
    /// Build a coordinator from explicit collaborators
    ///
    /// Fails if the config is invalid or no instance identity can be drawn.
    pub fn with_parts(
        store: S,
        ids: I,
        clock: C,
        config: CoordinatorConfig,
    ) -> Result<Self, LockError> {
        config.validate()?;
        let instance_id = new_instance_id(&ids)?;
        info!(instance = %instance_id, "lock coordinator ready ({})", config.backoff);

        Ok(Self {
            inner: Arc::new(Inner {
                store,
                ids,
                clock,
                instance_id,
                config,
                critical: Mutex::new(()),
            }),
        })
    }

    pub fn instance_id(&self) -> InstanceId {
        self.inner.instance_id
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    /// Look up a lock, creating it if absent or released and `create` is set
    ///
    /// A held record is returned as-is whoever owns it; check
    /// [`Lock::is_owned_by`] to learn whether the caller is the owner.
    /// Returns `None` only when `create` is false and no held record exists.
    pub fn get_lock(
        &self,
        name: &str,
        create: bool,
        ctx: &ExecutionContext,
    ) -> Result<Option<Lock<S, I, C>>, LockError> {
        validate_name(name)?;

        let existing = self.inner.store.get(name)?;
        if let Some(record) = existing.filter(|r| r.locked) {
            return Ok(Some(self.bind(record)));
        }
        if !create {
            return Ok(None);
        }

        let _section = self.enter();

        // Another thread of this process may have created it while we waited
        let previous = self.inner.store.get(name)?;
        if let Some(record) = previous.as_ref().filter(|r| r.locked) {
            debug!(lock = name, owner = %record.owner_execution_id, "lock created concurrently");
            return Ok(Some(self.bind(record.clone())));
        }

        let token = self.fresh_token(previous.as_ref())?;
        let record = LockRecord::acquired(name, token, ctx.execution_id(), self.instance_id());
        self.inner.store.put(name, &record)?;
        info!(
            lock = name,
            token = %token,
            execution = %ctx.execution_id(),
            "lock acquired"
        );

        Ok(Some(self.bind(record)))
    }

    /// Non-blocking acquisition that only returns locks the caller owns
    pub fn try_lock(
        &self,
        name: &str,
        ctx: &ExecutionContext,
    ) -> Result<Option<Lock<S, I, C>>, LockError> {
        Ok(self
            .get_lock(name, true, ctx)?
            .filter(|lock| lock.is_owned_by(ctx)))
    }

    /// Poll until the caller owns `name` or the attempt budget runs out
    ///
    /// Sleeps between attempts follow the configured linear backoff. There is
    /// no wake-up on release; waiters only notice on their next poll.
    pub fn wait_for_lock(
        &self,
        name: &str,
        ctx: &ExecutionContext,
    ) -> Result<Lock<S, I, C>, LockError> {
        let backoff = &self.inner.config.backoff;

        for attempt in 0..backoff.max_attempts {
            if let Some(lock) = self.get_lock(name, true, ctx)? {
                if lock.is_owned_by(ctx) {
                    return Ok(lock);
                }
            }

            if attempt + 1 < backoff.max_attempts {
                let delay = backoff.delay_for(attempt);
                debug!(lock = name, attempt, ?delay, "lock busy, backing off");
                self.inner.clock.sleep(delay);
            }
        }

        warn!(
            lock = name,
            attempts = backoff.max_attempts,
            "gave up waiting for lock"
        );
        Err(LockError::Timeout {
            name: name.to_string(),
            attempts: backoff.max_attempts,
        })
    }

    /// Ownership of `name` as seen by `ctx`, without creating anything
    pub fn ownership(&self, name: &str, ctx: &ExecutionContext) -> Result<Ownership, LockError> {
        validate_name(name)?;
        Ok(self
            .inner
            .store
            .get(name)?
            .map_or(Ownership::Unbound, |record| {
                record.ownership(ctx.execution_id(), self.instance_id())
            }))
    }

    /// Every record currently in the store
    pub fn locks(&self) -> Result<Vec<LockRecord>, LockError> {
        Ok(self.inner.store.entries()?)
    }

    /// Release path behind [`Lock::unlock`]
    ///
    /// A no-op unless `ctx` and this coordinator own `record` and it is still
    /// held. If the store now carries a different token for the name, the
    /// foreign record is left alone and only the local handle is released.
    pub(crate) fn release(
        &self,
        record: &mut LockRecord,
        ctx: &ExecutionContext,
    ) -> Result<bool, StoreError> {
        let _section = self.enter();

        if !record.is_owned_by(ctx.execution_id(), self.instance_id()) {
            debug!(
                lock = %record.name,
                execution = %ctx.execution_id(),
                "release ignored, caller is not the owner"
            );
            return Ok(false);
        }

        match self.inner.store.get(&record.name)? {
            Some(current) if current.token != record.token => {
                warn!(
                    lock = %record.name,
                    ours = %record.token,
                    theirs = %current.token,
                    "lock was overwritten by another owner, leaving it in place"
                );
            }
            _ => self.inner.store.remove(&record.name)?,
        }

        record.locked = false;
        info!(lock = %record.name, token = %record.token, "lock released");
        Ok(true)
    }

    fn bind(&self, record: LockRecord) -> Lock<S, I, C> {
        Lock::bind(record, self.clone())
    }

    fn enter(&self) -> MutexGuard<'_, ()> {
        self.inner
            .critical
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn fresh_token(&self, previous: Option<&LockRecord>) -> Result<LockToken, LockError> {
        loop {
            let token = LockToken(self.inner.ids.next_id()?);
            if previous.map_or(true, |p| p.token != token) {
                return Ok(token);
            }
        }
    }
}

fn validate_name(name: &str) -> Result<(), LockError> {
    if name.trim().is_empty() {
        return Err(LockError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
