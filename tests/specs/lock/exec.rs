//! Lock holding specs
//!
//! Contention is produced by nesting `lk` inside `lk exec`: the inner process
//! is a different lock instance, so it sees the outer process as the holder.

use crate::prelude::*;

#[test]
fn exec_runs_command_and_releases() {
    let temp = Project::empty();

    temp.lk().args(&["exec", "doc", "--", "true"]).passes();

    temp.lk()
        .args(&["status", "doc"])
        .passes()
        .stdout_eq("doc: unlocked\n");
    temp.lk().args(&["list"]).passes().stdout_eq("No locks held\n");
}

#[test]
fn exec_propagates_exit_code() {
    Project::empty()
        .lk()
        .args(&["exec", "doc", "--", "sh", "-c", "exit 3"])
        .exits_with(3);
}

#[test]
fn lock_is_visible_while_command_runs() {
    let temp = Project::empty();
    let lk = lk_bin();

    temp.lk()
        .args(&["exec", "doc", "--", &lk, "status", "doc"])
        .passes()
        .stdout_has("doc: locked by");

    temp.lk()
        .args(&["exec", "doc", "--", &lk, "list"])
        .passes()
        .stdout_has("doc locked token=");
}

#[test]
fn status_json_for_held_lock() {
    let temp = Project::empty();
    let lk = lk_bin();

    let outcome = temp
        .lk()
        .args(&["exec", "doc", "--", &lk, "--format", "json", "status", "doc"])
        .passes();

    let json = outcome.stdout_json();
    assert_eq!(json["locked"], true);
    assert_eq!(json["record"]["name"], "doc");
    assert_eq!(json["record"]["locked"], true);
}

#[test]
fn try_fails_fast_on_held_lock() {
    let temp = Project::empty();
    let lk = lk_bin();

    temp.lk()
        .args(&["exec", "doc", "--", &lk, "try", "doc", "--", "true"])
        .exits_with(EXIT_CONTENDED)
        .stderr_has("Lock 'doc' is held");
}

#[test]
fn try_runs_when_lock_is_free() {
    Project::empty()
        .lk()
        .args(&["try", "doc", "--", "sh", "-c", "echo ran"])
        .passes()
        .stdout_has("ran");
}

#[test]
fn different_names_do_not_contend() {
    let temp = Project::empty();
    let lk = lk_bin();

    temp.lk()
        .args(&["exec", "doc-1", "--", &lk, "try", "doc-2", "--", "true"])
        .passes();
}

#[test]
fn exec_times_out_on_held_lock() {
    let temp = Project::empty();
    let lk = lk_bin();

    temp.lk()
        .args(&[
            "exec", "doc", "--", &lk, "exec", "--max-attempts", "2", "doc", "--", "true",
        ])
        .exits_with(EXIT_CONTENDED)
        .stderr_has("Timed out waiting for lock 'doc' after 2 attempts");
}

#[test]
fn config_file_sets_attempts() {
    let temp = Project::empty();
    let config = temp.file(
        "latchkey.toml",
        "[backoff]\nbase = \"1ms\"\nincrement = \"1ms\"\nceiling = \"5ms\"\nmax_attempts = 3\n",
    );
    let config = config.display().to_string();
    let lk = lk_bin();

    temp.lk()
        .args(&[
            "exec", "doc", "--", &lk, "--config", &config, "exec", "doc", "--", "true",
        ])
        .exits_with(EXIT_CONTENDED)
        .stderr_has("after 3 attempts");
}

#[test]
fn ttl_lets_a_waiter_take_over_an_old_entry() {
    let temp = Project::empty();
    let lk = lk_bin();

    temp.lk()
        .args(&["exec", "doc", "--", &lk, "--ttl", "0s", "try", "doc", "--", "true"])
        .passes();

    temp.lk()
        .args(&["status", "doc"])
        .passes()
        .stdout_eq("doc: unlocked\n");
}
