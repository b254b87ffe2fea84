//! Current-draw coefficients for the energy model
//!
//! The figures are bench measurements of an ESP32-CAM class board, taken
//! offline with a shunt and averaged. They are rough by nature; the model is
//! only as good as these numbers.
//!
//! # Default coefficients
//! - Idle: 70 mA
//! - Camera capture: +120 mA on top of idle
//! - Wireless transmission: +250 mA on top of idle
//! - Inference: 180 mA base, plus 0.5 mA per millisecond of inference
//! - Battery: 2000 mAh
//!
//! # Example
//!
//! ```ignore
//! # use power_estimator::config::{ActivityCharging, EnergyConfig};
//! let config = EnergyConfig::default()
//!     .with_battery_capacity(1200.0)
//!     .with_activity_charging(ActivityCharging::Marginal);
//! ```

use crate::Error;

/// Default idle current in milliamps
pub const DEFAULT_IDLE_CURRENT_MA: f32 = 70.0;
/// Default incremental camera current in milliamps
pub const DEFAULT_CAMERA_CURRENT_MA: f32 = 120.0;
/// Default incremental wireless transmission current in milliamps
pub const DEFAULT_WIRELESS_CURRENT_MA: f32 = 250.0;
/// Default inference base current in milliamps
pub const DEFAULT_INFERENCE_BASE_CURRENT_MA: f32 = 180.0;
/// Default inference current growth per millisecond of inference
pub const DEFAULT_INFERENCE_PER_MS_CURRENT_MA: f32 = 0.5;
/// Default battery capacity in mAh
pub const DEFAULT_BATTERY_CAPACITY_MAH: f32 = 2000.0;
/// Default model memory footprint in kB (`MobileNetV2`, alpha 0.25)
pub const DEFAULT_MODEL_MEMORY_KB: u32 = 350;

/// How camera and wireless activity is charged
///
/// The bench model only integrates idle current continuously and charges
/// inference through its own cost formula. Camera and wireless time is
/// tracked for reporting but adds nothing to the accumulated charge, on the
/// assumption that it is folded into a conservative idle figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActivityCharging {
    /// Camera and wireless time adds no charge beyond idle
    #[default]
    IdleOnly,
    /// Camera and wireless add `incremental current * duration` when they end
    Marginal,
}

/// Energy model configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnergyConfig {
    /// Baseline current drawn at all times (mA)
    pub idle_current_ma: f32,
    /// Additional current while the camera captures (mA)
    pub camera_current_ma: f32,
    /// Additional current while the radio transmits (mA)
    pub wireless_current_ma: f32,
    /// Inference current independent of duration (mA)
    pub inference_base_current_ma: f32,
    /// Inference current growth per millisecond of inference (mA/ms)
    pub inference_per_ms_current_ma: f32,
    /// Battery capacity used when no capacity is given (mAh)
    pub battery_capacity_mah: f32,
    /// Camera and wireless charging policy
    pub activity_charging: ActivityCharging,
    /// Static model memory footprint, reported only (kB)
    pub model_memory_kb: u32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            idle_current_ma: DEFAULT_IDLE_CURRENT_MA,
            camera_current_ma: DEFAULT_CAMERA_CURRENT_MA,
            wireless_current_ma: DEFAULT_WIRELESS_CURRENT_MA,
            inference_base_current_ma: DEFAULT_INFERENCE_BASE_CURRENT_MA,
            inference_per_ms_current_ma: DEFAULT_INFERENCE_PER_MS_CURRENT_MA,
            battery_capacity_mah: DEFAULT_BATTERY_CAPACITY_MAH,
            activity_charging: ActivityCharging::IdleOnly,
            model_memory_kb: DEFAULT_MODEL_MEMORY_KB,
        }
    }
}

/// True when `value` is finite and not negative (rejects NaN)
const fn is_current(value: f32) -> bool {
    value >= 0.0 && value <= f32::MAX
}

impl EnergyConfig {
    /// Create a configuration from explicit coefficients
    ///
    /// # Arguments
    /// * `idle_current_ma` - Baseline current (mA)
    /// * `inference_base_current_ma` - Inference base current (mA)
    /// * `inference_per_ms_current_ma` - Inference current growth (mA/ms)
    /// * `battery_capacity_mah` - Default battery capacity (mAh)
    ///
    /// Camera and wireless currents take their defaults; adjust them with
    /// [`with_camera_current`](Self::with_camera_current) and
    /// [`with_wireless_current`](Self::with_wireless_current).
    ///
    /// # Errors
    /// Returns `InvalidConfig` if any current is negative or not finite, or if
    /// the capacity is not strictly positive.
    pub const fn new(
        idle_current_ma: f32,
        inference_base_current_ma: f32,
        inference_per_ms_current_ma: f32,
        battery_capacity_mah: f32,
    ) -> Result<Self, Error<()>> {
        let config = Self {
            idle_current_ma,
            camera_current_ma: DEFAULT_CAMERA_CURRENT_MA,
            wireless_current_ma: DEFAULT_WIRELESS_CURRENT_MA,
            inference_base_current_ma,
            inference_per_ms_current_ma,
            battery_capacity_mah,
            activity_charging: ActivityCharging::IdleOnly,
            model_memory_kb: DEFAULT_MODEL_MEMORY_KB,
        };
        match config.validate() {
            Ok(()) => Ok(config),
            Err(e) => Err(e),
        }
    }

    /// Check every coefficient
    ///
    /// Useful after building a configuration with struct literal syntax.
    ///
    /// # Errors
    /// Returns `InvalidConfig` on the same conditions as [`new`](Self::new).
    pub const fn validate(&self) -> Result<(), Error<()>> {
        if !is_current(self.idle_current_ma)
            || !is_current(self.camera_current_ma)
            || !is_current(self.wireless_current_ma)
            || !is_current(self.inference_base_current_ma)
            || !is_current(self.inference_per_ms_current_ma)
        {
            return Err(Error::InvalidConfig);
        }
        if !(self.battery_capacity_mah > 0.0 && self.battery_capacity_mah <= f32::MAX) {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }

    /// Replace the incremental camera current
    #[must_use]
    pub const fn with_camera_current(mut self, current_ma: f32) -> Self {
        self.camera_current_ma = current_ma;
        self
    }

    /// Replace the incremental wireless current
    #[must_use]
    pub const fn with_wireless_current(mut self, current_ma: f32) -> Self {
        self.wireless_current_ma = current_ma;
        self
    }

    /// Replace the default battery capacity
    #[must_use]
    pub const fn with_battery_capacity(mut self, capacity_mah: f32) -> Self {
        self.battery_capacity_mah = capacity_mah;
        self
    }

    /// Select the camera and wireless charging policy
    #[must_use]
    pub const fn with_activity_charging(mut self, policy: ActivityCharging) -> Self {
        self.activity_charging = policy;
        self
    }

    /// Replace the reported model memory footprint
    #[must_use]
    pub const fn with_model_memory(mut self, kb: u32) -> Self {
        self.model_memory_kb = kb;
        self
    }
}
