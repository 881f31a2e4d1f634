// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! This module provides an error type that includes:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)
//! - The process exit code to report

use lk_core::{BackoffConfig, LockRecord};
use std::fmt;

/// Exit code for a lock that is held elsewhere (EX_TEMPFAIL)
pub const EXIT_CONTENDED: u8 = 75;

/// Exit code for any other failure
pub const EXIT_FAILURE: u8 = 1;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct LkError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Process exit code
    pub exit_code: u8,
}

impl LkError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            exit_code: EXIT_FAILURE,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_exit_code(mut self, code: u8) -> Self {
        self.exit_code = code;
        self
    }

    /// Lock is held by someone else and the caller would not wait.
    pub fn lock_held(record: &LockRecord) -> Self {
        LkError::new(format!("Lock '{}' is held", record.name))
            .with_context(format!(
                "Held by instance {} (execution {}) since {}",
                record.owner_instance_id,
                record.owner_execution_id,
                record.acquired_at.format("%Y-%m-%d %H:%M:%S UTC")
            ))
            .with_suggestion(format!(
                "Wait for the holder with: lk exec {} -- <command>",
                record.name
            ))
            .with_suggestion(format!("Inspect the holder with: lk status {}", record.name))
            .with_exit_code(EXIT_CONTENDED)
    }

    /// Waiting for a lock ran out of attempts.
    pub fn lock_timeout(name: &str, backoff: &BackoffConfig) -> Self {
        LkError::new(format!(
            "Timed out waiting for lock '{}' after {} attempts",
            name, backoff.max_attempts
        ))
        .with_context(format!(
            "Waited up to {} ({})",
            humantime::format_duration(backoff.max_wait()),
            backoff
        ))
        .with_context("The current holder has not released the lock")
        .with_suggestion("Retry later, or raise --max-attempts")
        .with_suggestion(format!("Inspect the holder with: lk status {}", name))
        .with_suggestion("Abandoned locks expire only when the store is opened with --ttl")
        .with_exit_code(EXIT_CONTENDED)
    }
}

impl fmt::Display for LkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for LkError {}
