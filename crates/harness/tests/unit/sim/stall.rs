//! Stall Detector Unit Tests.

use rstest::rstest;
use vsim_harness::sim::StallDetector;

#[rstest]
#[case(1)]
#[case(3)]
#[case(10)]
fn fires_after_threshold_unchanged_checks(#[case] threshold: u64) {
    let mut stall = StallDetector::new(threshold);
    assert!(!stall.check(0x100));
    for i in 1..threshold {
        assert!(!stall.check(0x100), "fired early after {i} checks");
    }
    assert!(stall.check(0x100));
    assert_eq!(stall.stalled_cycles(), threshold);
}

#[test]
fn pc_change_resets_count() {
    let mut stall = StallDetector::new(2);
    assert!(!stall.check(0x10));
    assert!(!stall.check(0x10));
    assert!(!stall.check(0x14));
    assert_eq!(stall.stalled_cycles(), 0);
    assert!(!stall.check(0x14));
    assert!(stall.check(0x14));
}

#[test]
fn initial_previous_pc_is_zero() {
    let mut stall = StallDetector::new(2);
    assert!(!stall.check(0));
    assert!(stall.check(0));
    assert_eq!(stall.threshold(), 2);
}

#[test]
fn keeps_reporting_while_stalled() {
    let mut stall = StallDetector::new(1);
    let _ = stall.check(0x40);
    assert!(stall.check(0x40));
    assert!(stall.check(0x40));
}
