//! Integration tests for a full capture / classify / upload duty cycle

use crate::common::{assert_float_eq, create_monitor};
use power_estimator::{ActivityKind, InferenceCostModel};

const HOUR_MS: u64 = 3_600_000;

/// One capture-classify-upload cycle starting at the current clock reading
fn run_cycle(
    monitor: &mut power_estimator::EnergyMonitor<crate::common::MockClock>,
    clock: &crate::common::MockClock,
    camera_ms: u64,
    inference_ms: u64,
    upload_ms: u64,
) {
    monitor.start_camera();
    clock.advance(camera_ms);
    monitor.end_camera();

    monitor.start_inference();
    clock.advance(inference_ms);
    monitor.end_inference();

    monitor.start_wireless_transmission();
    clock.advance(upload_ms);
    monitor.end_wireless_transmission();
}

#[test]
fn test_single_cycle_then_idle() {
    let (mut monitor, clock) = create_monitor();

    run_cycle(&mut monitor, &clock, 200, 100, 1_000);
    clock.set(HOUR_MS);

    // Idle everywhere except the inference span, which is charged by the model
    let model = InferenceCostModel::new(180.0, 0.5);
    let idle = 70.0 * (HOUR_MS - 100) as f64 / HOUR_MS as f64;
    assert_float_eq(monitor.total_usage(), idle + model.cost_ms(100), 1e-9);

    assert_eq!(monitor.active_time_ms(ActivityKind::Camera), 200);
    assert_eq!(monitor.active_time_ms(ActivityKind::Inference), 100);
    assert_eq!(monitor.active_time_ms(ActivityKind::WirelessTransmission), 1_000);
}

#[test]
fn test_periodic_cycles_with_polling() {
    let (mut monitor, clock) = create_monitor();

    let mut previous = 0.0;
    for i in 0..120_u64 {
        run_cycle(&mut monitor, &clock, 150, 80 + i % 40, 900);
        clock.advance(28_000);
        monitor.update();

        let total = monitor.total_usage();
        assert!(total > previous);
        previous = total;
    }

    assert_eq!(monitor.inference_count(), 120);
    assert!(monitor.average_inference_time() >= 80.0);
    assert!(monitor.average_inference_time() < 120.0);
    assert!(monitor.estimated_remaining_hours().is_some());
}

#[test]
fn test_stats_snapshot() {
    let (mut monitor, clock) = create_monitor();

    run_cycle(&mut monitor, &clock, 2_000, 100, 3_000);
    run_cycle(&mut monitor, &clock, 2_000, 100, 3_000);
    clock.set(HOUR_MS);

    let stats = monitor.stats();
    assert_eq!(stats.timestamp_ms, HOUR_MS);
    assert_eq!(stats.inference_count, 2);
    assert_float_eq(stats.avg_inference_ms, 100.0, 1e-12);
    assert_float_eq(stats.avg_inference_mah, monitor.inference_cost(100.0), 1e-15);
    assert_float_eq(stats.camera_active_s, 4.0, 1e-12);
    assert_float_eq(stats.wireless_active_s, 6.0, 1e-12);
    assert_float_eq(stats.inference_active_s, 0.2, 1e-12);
    assert_eq!(stats.model_memory_kb, 350);
    assert_float_eq(stats.total_mah, monitor.total_usage(), 1e-15);

    let rate = stats.avg_current_ma.expect("rate available");
    assert_float_eq(rate, stats.total_mah, 1e-9);
    let hours = stats.remaining_hours.expect("estimate available");
    assert_float_eq(hours, 2000.0 / rate, 1e-9);
}

#[test]
fn test_stats_display() {
    let (mut monitor, clock) = create_monitor();

    run_cycle(&mut monitor, &clock, 500, 100, 1_500);
    clock.set(HOUR_MS);

    let text = monitor.stats().to_string();
    assert!(text.starts_with("--- Power Usage Statistics ---"));
    assert!(text.contains("ML inference count: 1"));
    assert!(text.contains("Avg inference time: 100.0 ms"));
    assert!(text.contains("Camera active time: 0.5 sec"));
    assert!(text.contains("WiFi TX active time: 1.5 sec"));
    assert!(text.contains("ML model memory: 350 kB"));
    assert!(text.contains("Estimated runtime: "));
    assert!(!text.contains("n/a"));
}

#[test]
fn test_stats_at_boot() {
    let (mut monitor, _clock) = create_monitor();
    let stats = monitor.stats();

    assert_eq!(stats.inference_count, 0);
    assert!(stats.remaining_hours.is_none());
    assert!(stats.avg_current_ma.is_none());
    assert!(stats.to_string().contains("Estimated runtime: n/a"));
}

#[test]
fn test_independent_monitors() {
    let (mut first, first_clock) = create_monitor();
    let (mut second, second_clock) = create_monitor();

    run_cycle(&mut first, &first_clock, 100, 100, 100);
    second_clock.set(HOUR_MS);

    assert_eq!(first.inference_count(), 1);
    assert_eq!(second.inference_count(), 0);
    assert_float_eq(second.total_usage(), 70.0, 1e-9);
    assert!(first.total_usage() < 1.0);
}

#[test]
fn test_release_returns_clock() {
    let (monitor, clock) = create_monitor();
    clock.set(1_234);
    let released = monitor.release();
    assert_eq!(released.get(), 1_234);
}
