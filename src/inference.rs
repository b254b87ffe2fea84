//! Inference cost model
//!
//! An inference is charged as a single closed-form evaluation over its whole
//! span, not integrated over sub-intervals:
//!
//! ```text
//! cost(d) = (base_mA + per_ms_mA * d) * (d / 3_600_000)     [mAh]
//! ```
//!
//! With a non-zero per-millisecond term the cost grows quadratically with
//! duration.

use crate::units;

/// Closed-form inference charge
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InferenceCostModel {
    /// Current independent of duration (mA)
    pub base_current_ma: f32,
    /// Current growth per millisecond of inference (mA/ms)
    pub per_ms_current_ma: f32,
}

impl InferenceCostModel {
    /// Create a cost model
    pub const fn new(base_current_ma: f32, per_ms_current_ma: f32) -> Self {
        Self {
            base_current_ma,
            per_ms_current_ma,
        }
    }

    /// Charge of one inference lasting `duration_ms` (mAh)
    ///
    /// Fractional durations are accepted so the model can be evaluated at an
    /// average. Negative or NaN durations cost nothing.
    pub fn cost(&self, duration_ms: f64) -> f64 {
        if duration_ms.is_nan() || duration_ms <= 0.0 {
            return 0.0;
        }
        let current_ma =
            f64::from(self.base_current_ma) + f64::from(self.per_ms_current_ma) * duration_ms;
        current_ma * units::ms_f64_to_hours(duration_ms)
    }

    /// Charge of one inference lasting a whole number of milliseconds (mAh)
    #[allow(clippy::cast_precision_loss)]
    pub fn cost_ms(&self, duration_ms: u64) -> f64 {
        self.cost(duration_ms as f64)
    }
}

/// Streaming aggregate of completed inferences
///
/// Only the count and the duration sum are kept; there is no per-event
/// history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InferenceStats {
    count: u32,
    total_duration_ms: u64,
}

impl InferenceStats {
    /// Empty aggregate
    pub const fn new() -> Self {
        Self {
            count: 0,
            total_duration_ms: 0,
        }
    }

    /// Fold one completed inference into the aggregate
    pub fn record(&mut self, duration_ms: u64) {
        self.count = self.count.saturating_add(1);
        self.total_duration_ms = self.total_duration_ms.saturating_add(duration_ms);
    }

    /// Number of completed inferences
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Sum of completed inference durations (ms)
    pub const fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms
    }

    /// Mean inference duration (ms), `0` before the first inference
    #[allow(clippy::cast_precision_loss)]
    pub fn average_duration_ms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total_duration_ms as f64 / f64::from(self.count)
    }
}
