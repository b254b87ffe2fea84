//! Unit tests for the async battery voltage reader

use crate::common::test_utils::MockDelay;
use crate::common::{MockAdc, MockAdcError};
use power_estimator::{BatteryConfig, BatteryMonitor, Error};

fn block_on<F: core::future::Future>(f: F) -> F::Output {
    futures::executor::block_on(f)
}

#[test]
fn test_async_full_scale() {
    block_on(async {
        let mut battery = BatteryMonitor::new(MockAdc::new(4095));
        let reading = battery.sample().await.unwrap();
        assert_eq!(reading.percentage, 100);
        assert!((reading.voltage - 6.6).abs() < 1e-4);
    });
}

#[test]
fn test_async_drop() {
    block_on(async {
        let config = BatteryConfig::default();
        let adc = MockAdc::new(2420);
        adc.queue(&[2544]);
        let mut battery = BatteryMonitor::new(adc);

        battery.sample().await.unwrap();
        let second = battery.sample().await.unwrap();

        let expected = config.voltage_from_raw(2544) - config.voltage_from_raw(2420);
        assert!((second.drop - expected).abs() < 1e-5);
    });
}

#[test]
fn test_async_failure() {
    block_on(async {
        let adc = MockAdc::new(3000);
        adc.fail_next_read();
        let mut battery = BatteryMonitor::new(adc);

        assert_eq!(battery.sample().await, Err(Error::Adc(MockAdcError)));
        assert!(battery.sample().await.is_ok());
    });
}

#[test]
fn test_async_sample_if_due() {
    block_on(async {
        let adc = MockAdc::new(3000);
        let mut battery = BatteryMonitor::new(adc.clone());

        assert!(battery.sample_if_due(0).await.unwrap().is_some());
        assert!(battery.sample_if_due(10_000).await.unwrap().is_none());
        assert!(battery.sample_if_due(30_001).await.unwrap().is_some());
        assert_eq!(adc.reads(), 2);
    });
}

#[test]
fn test_async_averaged() {
    block_on(async {
        let adc = MockAdc::new(3000);
        adc.queue(&[1000]);
        let mut battery = BatteryMonitor::new(adc);
        let mut delay = MockDelay::default();

        let voltage = battery
            .read_voltage_averaged(&mut delay, 2, 50)
            .await
            .unwrap();
        let expected = BatteryConfig::default().voltage_from_raw(2000);
        assert!((voltage - expected).abs() < 1e-4);
        assert_eq!(delay.total_ns, 50_000);

        let result = battery.read_voltage_averaged(&mut delay, 0, 50).await;
        assert_eq!(result, Err(Error::InvalidConfig));
    });
}
