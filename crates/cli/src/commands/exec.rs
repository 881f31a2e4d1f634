// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run a command while holding a lock

use super::Settings;
use crate::error::{LkError, EXIT_FAILURE};
use clap::Args;
use lk_core::{Clock, ExecutionContext, IdentitySource, Lock, LockError, LockStore};
use std::process::Command;
use tracing::{debug, warn};

#[derive(Args)]
pub struct ExecArgs {
    /// Lock name
    pub name: String,

    /// Override the configured number of lock attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Command to run while holding the lock
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

#[derive(Args)]
pub struct TryArgs {
    /// Lock name
    pub name: String,

    /// Command to run while holding the lock
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

/// Wait for the lock, run the command, release; returns the command's exit code
pub fn exec(settings: &mut Settings, args: ExecArgs) -> anyhow::Result<u8> {
    if let Some(attempts) = args.max_attempts {
        settings.config.backoff.max_attempts = attempts;
    }
    let coordinator = settings.coordinator()?;
    let ctx = ExecutionContext::current()?;

    let lock = match coordinator.wait_for_lock(&args.name, &ctx) {
        Ok(lock) => lock,
        Err(LockError::Timeout { name, .. }) => {
            return Err(LkError::lock_timeout(&name, &coordinator.config().backoff).into());
        }
        Err(e) => return Err(e.into()),
    };
    run_holding(lock, &ctx, &args.command)
}

/// Run the command only if the lock is free right now
pub fn try_exec(settings: &Settings, args: TryArgs) -> anyhow::Result<u8> {
    let coordinator = settings.coordinator()?;
    let ctx = ExecutionContext::current()?;

    let Some(lock) = coordinator.get_lock(&args.name, true, &ctx)? else {
        anyhow::bail!("lock '{}' could not be created", args.name);
    };
    if !lock.is_owned_by(&ctx) {
        return Err(LkError::lock_held(lock.record()).into());
    }
    run_holding(lock, &ctx, &args.command)
}

fn run_holding<S, I, C>(
    mut lock: Lock<S, I, C>,
    ctx: &ExecutionContext,
    command: &[String],
) -> anyhow::Result<u8>
where
    S: LockStore,
    I: IdentitySource,
    C: Clock,
{
    let Some((program, rest)) = command.split_first() else {
        anyhow::bail!("no command given");
    };
    debug!(lock = lock.name(), program = %program, "running command under lock");

    let outcome = Command::new(program).args(rest).status();

    if !lock.unlock(ctx)? {
        warn!(lock = lock.name(), "lock was no longer ours at release");
    }

    let status = outcome.map_err(|e| {
        LkError::new(format!("Failed to run '{}'", program))
            .with_context(e.to_string())
            .with_suggestion("Check that the command exists and is executable")
    })?;
    Ok(status
        .code()
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(EXIT_FAILURE))
}
