//! Behavioral specifications for the lk CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, and exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

// cli/
#[path = "specs/cli/errors.rs"]
mod cli_errors;
#[path = "specs/cli/help.rs"]
mod cli_help;

// lock/
#[path = "specs/lock/exec.rs"]
mod lock_exec;
#[path = "specs/lock/status.rs"]
mod lock_status;
