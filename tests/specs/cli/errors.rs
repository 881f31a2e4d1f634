//! Error reporting specs

use crate::prelude::*;

#[test]
fn exec_without_command_is_a_usage_error() {
    Project::empty().lk().args(&["exec", "doc"]).exits_with(2);
}

#[test]
fn blank_lock_name_is_rejected() {
    Project::empty()
        .lk()
        .args(&["status", ""])
        .exits_with(1)
        .stderr_has("invalid lock name");
}

#[test]
fn missing_config_file_is_reported() {
    Project::empty()
        .lk()
        .args(&["--config", "missing.toml", "list"])
        .exits_with(1)
        .stderr_has("failed to read config")
        .stderr_has("missing.toml");
}

#[test]
fn invalid_config_is_reported() {
    let temp = Project::empty();
    temp.file("latchkey.toml", "[backoff]\nmax_attempts = 0\n");

    temp.lk()
        .args(&["--config", "latchkey.toml", "list"])
        .exits_with(1)
        .stderr_has("max_attempts");
}

#[test]
fn invalid_ttl_is_a_usage_error() {
    Project::empty()
        .lk()
        .args(&["--ttl", "whenever", "list"])
        .exits_with(2);
}

#[test]
fn unknown_program_fails_and_releases_the_lock() {
    let temp = Project::empty();

    temp.lk()
        .args(&["exec", "doc", "--", "lk-definitely-not-a-program"])
        .exits_with(1)
        .stderr_has("Failed to run 'lk-definitely-not-a-program'");

    temp.lk()
        .args(&["status", "doc"])
        .passes()
        .stdout_eq("doc: unlocked\n");
}

#[test]
fn try_does_not_take_max_attempts() {
    Project::empty()
        .lk()
        .args(&["try", "--max-attempts", "2", "doc", "--", "true"])
        .exits_with(2)
        .stderr_has("--max-attempts");
}
