//! Help and version specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    Project::empty()
        .lk()
        .args(&["--help"])
        .passes()
        .stdout_has("status")
        .stdout_has("list")
        .stdout_has("exec")
        .stdout_has("try");
}

#[test]
fn version_prints_name() {
    Project::empty()
        .lk()
        .args(&["--version"])
        .passes()
        .stdout_has("lk ");
}

#[test]
fn exec_help_mentions_max_attempts() {
    Project::empty()
        .lk()
        .args(&["exec", "--help"])
        .passes()
        .stdout_has("--max-attempts");
}
