//! Lock inspection specs

use crate::prelude::*;

#[test]
fn status_of_unknown_lock_is_unlocked() {
    Project::empty()
        .lk()
        .args(&["status", "doc"])
        .passes()
        .stdout_eq("doc: unlocked\n");
}

#[test]
fn list_on_empty_store() {
    Project::empty()
        .lk()
        .args(&["list"])
        .passes()
        .stdout_eq("No locks held\n");
}

#[test]
fn status_json_for_unlocked_lock() {
    let outcome = Project::empty()
        .lk()
        .args(&["--format", "json", "status", "doc"])
        .passes();

    let json = outcome.stdout_json();
    assert_eq!(json["name"], "doc");
    assert_eq!(json["locked"], false);
    assert!(json["record"].is_null());
}

#[test]
fn status_creates_the_store_directory() {
    let temp = Project::empty();
    temp.lk().args(&["list"]).passes();
    assert!(temp.store().is_dir());
}
