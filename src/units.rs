//! Time-unit conversions
//!
//! Every millisecond-to-hour conversion in the crate goes through this module
//! so the accounting engine, the cost model and the runtime estimator agree on
//! the exact divisor.

/// Milliseconds in one hour
pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// Milliseconds in one second
pub const MS_PER_SECOND: f64 = 1_000.0;

/// Convert whole milliseconds to hours
#[allow(clippy::cast_precision_loss)]
pub fn ms_to_hours(ms: u64) -> f64 {
    ms as f64 / MS_PER_HOUR
}

/// Convert fractional milliseconds to hours
///
/// Used for averaged durations, which are not whole milliseconds.
pub fn ms_f64_to_hours(ms: f64) -> f64 {
    ms / MS_PER_HOUR
}

/// Convert whole milliseconds to seconds
#[allow(clippy::cast_precision_loss)]
pub fn ms_to_seconds(ms: u64) -> f64 {
    ms as f64 / MS_PER_SECOND
}

/// Charge drawn by a constant current over a span
///
/// # Arguments
/// * `current_ma` - Current draw in milliamps
/// * `elapsed_ms` - Span length in milliseconds
///
/// # Returns
/// Charge in mAh
pub fn charge_mah(current_ma: f32, elapsed_ms: u64) -> f64 {
    f64::from(current_ma) * ms_to_hours(elapsed_ms)
}
