//! Unit tests for configuration validation

use crate::common::MockClock;
use power_estimator::{BatteryConfig, EnergyConfig, EnergyMonitor, Error};

#[test]
fn test_default_config_is_valid() {
    assert!(EnergyConfig::default().validate().is_ok());
    assert!(EnergyMonitor::with_config(MockClock::new(0), EnergyConfig::default()).is_ok());
}

#[test]
fn test_monitor_rejects_negative_idle() {
    let config = EnergyConfig {
        idle_current_ma: -70.0,
        ..EnergyConfig::default()
    };
    let result = EnergyMonitor::with_config(MockClock::new(0), config);
    assert!(matches!(result, Err(Error::InvalidConfig)));
}

#[test]
fn test_monitor_rejects_nan_camera_current() {
    let config = EnergyConfig::default().with_camera_current(f32::NAN);
    assert!(EnergyMonitor::with_config(MockClock::new(0), config).is_err());
}

#[test]
fn test_monitor_rejects_zero_capacity() {
    let config = EnergyConfig::default().with_battery_capacity(0.0);
    assert!(EnergyMonitor::with_config(MockClock::new(0), config).is_err());
}

#[test]
#[allow(clippy::float_cmp)]
fn test_new_matches_defaults_for_unlisted_fields() {
    let config = EnergyConfig::new(50.0, 100.0, 0.1, 1000.0).expect("valid config");
    let defaults = EnergyConfig::default();
    assert_eq!(config.camera_current_ma, defaults.camera_current_ma);
    assert_eq!(config.wireless_current_ma, defaults.wireless_current_ma);
    assert_eq!(config.activity_charging, defaults.activity_charging);
}

#[test]
fn test_battery_config_validation() {
    assert!(BatteryConfig::default().validate().is_ok());
    assert!(BatteryConfig::new(2.0, 3.3, 4.2).is_ok());
    assert!(BatteryConfig::new(2.0, 4.2, 3.3).is_err());
    assert!(BatteryConfig::new(-2.0, 3.3, 4.2).is_err());

    let config = BatteryConfig {
        adc_max: 0,
        ..BatteryConfig::default()
    };
    assert!(config.validate().is_err());

    let config = BatteryConfig {
        reference_voltage: 0.0,
        ..BatteryConfig::default()
    };
    assert!(config.validate().is_err());
}
