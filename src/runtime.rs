//! Runtime estimation
//!
//! A linear extrapolation of the historical average: the total charge drawn
//! so far divided by the time since boot gives an average current, and the
//! battery capacity divided by that current gives the remaining hours.
//!
//! This is not a predictive model. Early in a run the average is dominated by
//! whatever happened first; the figure settles once the device has cycled
//! through its duty pattern a number of times.

use crate::units;

/// Average current over the run so far (mA)
///
/// # Returns
/// `None` when no time has elapsed since boot
pub fn average_current_ma(accumulated_mah: f64, elapsed_since_boot_ms: u64) -> Option<f64> {
    if elapsed_since_boot_ms == 0 {
        return None;
    }
    let rate = accumulated_mah / units::ms_to_hours(elapsed_since_boot_ms);
    rate.is_finite().then_some(rate)
}

/// Hours until `capacity_mah` is drawn at the historical average rate
///
/// # Returns
/// `None` when the estimate is unavailable:
/// - no time has elapsed since boot
/// - nothing has been drawn yet (infinite runtime)
/// - `capacity_mah` is not a positive finite number
pub fn remaining_hours(
    capacity_mah: f32,
    accumulated_mah: f64,
    elapsed_since_boot_ms: u64,
) -> Option<f64> {
    let capacity = f64::from(capacity_mah);
    if !(capacity > 0.0 && capacity.is_finite()) {
        return None;
    }

    let rate = average_current_ma(accumulated_mah, elapsed_since_boot_ms)?;
    if rate <= 0.0 {
        return None;
    }

    let hours = capacity / rate;
    hours.is_finite().then_some(hours)
}
