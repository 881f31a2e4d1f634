// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! lk-storage: Lock store backends beyond the in-memory one
//!
//! [`FileLockStore`] keeps one JSON document per lock in a directory, so any
//! process that can see the directory shares the same locks.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod file;

pub use file::FileLockStore;
