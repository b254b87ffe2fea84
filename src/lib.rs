#![cfg_attr(not(test), no_std)]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod activity;
pub mod battery;
pub mod charge;
pub mod clock;
pub mod config;
pub mod inference;
pub mod monitor;
pub mod runtime;
pub mod stats;
pub mod units;

// Re-export main types
pub use activity::{ActivityKind, ActivityTracker, ClosedInterval};
#[cfg(feature = "async")]
pub use battery::AsyncAdcChannel;
pub use battery::{AdcChannel, BatteryConfig, BatteryMonitor, BatteryReading};
pub use charge::ChargeIntegrator;
#[cfg(feature = "embassy-time")]
pub use clock::EmbassyClock;
pub use clock::{FnClock, MonotonicClock};
pub use config::{ActivityCharging, EnergyConfig};
pub use inference::{InferenceCostModel, InferenceStats};
pub use monitor::{EnergyMonitor, InferenceEvent};
pub use stats::PowerStats;

/// Crate errors
///
/// The energy model itself never fails; errors only come from configuration
/// validation and from the battery ADC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// ADC conversion error
    Adc(E),
    /// Invalid configuration parameter
    InvalidConfig,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Adc(error)
    }
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Adc(e) => write!(f, "ADC error: {e:?}"),
            Self::InvalidConfig => write!(f, "invalid configuration"),
        }
    }
}
