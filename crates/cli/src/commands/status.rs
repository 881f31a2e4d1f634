// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lock inspection commands

use super::Settings;
use crate::output;
use clap::Args;
use lk_core::{ExecutionContext, LockRecord};
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct StatusArgs {
    /// Lock name
    pub name: String,
}

#[derive(Serialize)]
struct LockStatus {
    name: String,
    locked: bool,
    record: Option<LockRecord>,
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.record {
            None => write!(f, "{}: unlocked", self.name),
            Some(record) => write!(
                f,
                "{}: locked by {}/{} (token {}, since {})",
                self.name,
                record.owner_instance_id,
                record.owner_execution_id,
                record.token,
                record.acquired_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        }
    }
}

pub fn status(settings: &Settings, args: StatusArgs) -> anyhow::Result<()> {
    let coordinator = settings.coordinator()?;
    let ctx = ExecutionContext::current()?;

    let record = coordinator
        .get_lock(&args.name, false, &ctx)?
        .map(|lock| lock.into_record());
    let status = LockStatus {
        name: args.name,
        locked: record.is_some(),
        record,
    };
    output::print(&status, settings.format)
}

pub fn list(settings: &Settings) -> anyhow::Result<()> {
    let coordinator = settings.coordinator()?;
    let records: Vec<_> = coordinator
        .locks()?
        .into_iter()
        .filter(|record| record.locked)
        .collect();
    output::print_list(&records, "No locks held", settings.format)
}
