//! Point-in-time power statistics
//!
//! [`PowerStats`] captures every reported quantity at one instant. The
//! `Display` impl renders the same block the firmware prints on its serial
//! console; any other serialization only needs the fields.

use core::fmt;

/// Snapshot of the energy model
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerStats {
    /// Timestamp the snapshot was taken at (ms since boot)
    pub timestamp_ms: u64,
    /// Total estimated charge drawn (mAh)
    pub total_mah: f64,
    /// Completed inferences
    pub inference_count: u32,
    /// Mean inference duration (ms)
    pub avg_inference_ms: f64,
    /// Charge of an inference of mean duration (mAh)
    pub avg_inference_mah: f64,
    /// Static model memory footprint (kB)
    pub model_memory_kb: u32,
    /// Cumulative camera time (s)
    pub camera_active_s: f64,
    /// Cumulative wireless transmission time (s)
    pub wireless_active_s: f64,
    /// Cumulative inference time (s)
    pub inference_active_s: f64,
    /// Average current since boot (mA), `None` at the boot instant
    pub avg_current_ma: Option<f64>,
    /// Projected runtime against the configured capacity (h)
    pub remaining_hours: Option<f64>,
}

impl fmt::Display for PowerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Power Usage Statistics ---")?;
        writeln!(f, "Total estimated power usage: {:.2} mAh", self.total_mah)?;
        writeln!(f, "ML inference count: {}", self.inference_count)?;
        writeln!(f, "Avg inference time: {:.1} ms", self.avg_inference_ms)?;
        writeln!(f, "Avg inference power: {:.3} mAh", self.avg_inference_mah)?;
        writeln!(f, "ML model memory: {} kB", self.model_memory_kb)?;
        writeln!(f, "Camera active time: {:.1} sec", self.camera_active_s)?;
        writeln!(f, "WiFi TX active time: {:.1} sec", self.wireless_active_s)?;
        writeln!(f, "ML inference time: {:.1} sec", self.inference_active_s)?;
        match self.remaining_hours {
            Some(hours) => writeln!(f, "Estimated runtime: {hours:.1} h")?,
            None => writeln!(f, "Estimated runtime: n/a")?,
        }
        write!(f, "-----------------------------")
    }
}
