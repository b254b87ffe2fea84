//! Unit tests for idle charge integration

use crate::common::{assert_float_eq, create_monitor, create_monitor_with};
use power_estimator::EnergyConfig;

const HOUR_MS: u64 = 3_600_000;

#[test]
fn test_one_hour_idle_is_seventy_mah() {
    let (mut monitor, clock) = create_monitor();
    clock.set(HOUR_MS);
    assert_float_eq(monitor.total_usage(), 70.0, 1e-9);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_fresh_monitor_has_drawn_nothing() {
    let (mut monitor, _clock) = create_monitor();
    assert_eq!(monitor.total_usage(), 0.0);
}

#[test]
fn test_accumulation_is_non_decreasing() {
    let (mut monitor, clock) = create_monitor();
    let steps = [0, 1, 17, 999, 60_000, 0, 3, 120_000, 1];

    let mut previous = monitor.total_usage();
    for step in steps {
        clock.advance(step);
        monitor.update();
        let total = monitor.total_usage();
        assert!(total >= previous, "{total} < {previous}");
        previous = total;
    }

    let expected = 70.0 * clock.get() as f64 / HOUR_MS as f64;
    assert_float_eq(previous, expected, 1e-9);
}

#[test]
#[allow(clippy::float_cmp)]
fn test_reading_twice_is_idempotent() {
    let (mut monitor, clock) = create_monitor();
    clock.set(90_000);
    let first = monitor.total_usage();
    let second = monitor.total_usage();
    assert_eq!(first, second);
}

#[test]
fn test_stale_read_does_not_checkpoint() {
    let (mut monitor, clock) = create_monitor();
    clock.set(HOUR_MS);
    assert!(monitor.accumulated_mah() < 1e-12);
    monitor.update();
    assert_float_eq(monitor.accumulated_mah(), 70.0, 1e-9);
}

#[test]
fn test_camera_and_wireless_charge_idle_only() {
    let (mut monitor, clock) = create_monitor();

    monitor.start_camera();
    clock.advance(HOUR_MS / 2);
    monitor.end_camera();
    monitor.start_wireless_transmission();
    clock.advance(HOUR_MS / 2);
    monitor.end_wireless_transmission();

    assert_float_eq(monitor.total_usage(), 70.0, 1e-9);
}

#[test]
fn test_backwards_clock_never_decreases_total() {
    let (mut monitor, clock) = create_monitor();
    clock.set(HOUR_MS);
    let before = monitor.total_usage();

    clock.set(HOUR_MS / 2);
    assert!(monitor.total_usage() >= before);

    // Time before the high-water mark is not charged twice
    clock.set(HOUR_MS);
    assert_float_eq(monitor.total_usage(), before, 1e-9);
}

#[test]
fn test_thirty_day_run() {
    let (mut monitor, clock) = create_monitor();
    for _ in 0..(30 * 24) {
        clock.advance(HOUR_MS);
        monitor.update();
    }
    assert_float_eq(monitor.total_usage(), 70.0 * 30.0 * 24.0, 1e-6);
}

#[test]
fn test_custom_idle_current() {
    let config = EnergyConfig::new(12.5, 180.0, 0.5, 2000.0).expect("valid config");
    let (mut monitor, clock) = create_monitor_with(config);
    clock.set(2 * HOUR_MS);
    assert_float_eq(monitor.total_usage(), 25.0, 1e-9);
}
