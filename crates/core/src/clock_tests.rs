// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_sleep_blocks_for_at_least_duration() {
    let clock = SystemClock;
    let t1 = clock.now();
    clock.sleep(Duration::from_millis(2));
    assert!(clock.now().duration_since(t1) >= Duration::from_millis(2));
}

#[test]
fn fake_clock_sleep_advances_time_and_records() {
    let clock = FakeClock::new();
    let t1 = clock.now();

    clock.sleep(Duration::from_millis(50));
    clock.sleep(Duration::from_millis(100));

    assert_eq!(clock.now().duration_since(t1), Duration::from_millis(150));
    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_millis(50), Duration::from_millis(100)]
    );
    assert_eq!(clock.total_slept(), Duration::from_millis(150));
}

#[test]
fn fake_clock_advance_is_not_a_sleep() {
    let clock = FakeClock::new();
    clock.advance(Duration::from_secs(60));
    assert!(clock.sleeps().is_empty());
}

#[test]
fn fake_clock_clones_share_timeline() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let t1 = clock1.now();

    clock2.sleep(Duration::from_secs(30));

    assert_eq!(clock1.now().duration_since(t1), Duration::from_secs(30));
    assert_eq!(clock1.sleeps().len(), 1);
}
