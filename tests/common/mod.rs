//! Common test utilities and mock implementations


pub use mock_adc::{MockAdc, MockAdcError};
pub use mock_clock::MockClock;
pub use test_utils::{assert_float_eq, create_monitor, create_monitor_with};
