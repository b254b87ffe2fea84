//! Energy monitor
//!
//! [`EnergyMonitor`] is the call surface the application uses. It owns the
//! clock, the activity tracker, the charge integrator and the inference
//! aggregate, and wires them together:
//!
//! - every `start`/`end` checkpoints idle charge up to "now" first
//! - while an inference is open, idle charge stops at its start; ending it
//!   charges the closed-form cost for the whole span instead
//! - every read of the accumulated charge checkpoints first
//!
//! No operation fails. Protocol mistakes (unmatched ends, repeated starts,
//! clocks running backwards) degrade to zero-duration intervals.
//!
//! # Example
//!
//! ```ignore
//! # use power_estimator::{EnergyMonitor, clock::FnClock};
//! let mut monitor = EnergyMonitor::new(FnClock::new(|| hal::millis()));
//!
//! monitor.start_camera();
//! let frame = camera.capture();
//! monitor.end_camera();
//!
//! monitor.start_inference();
//! let label = model.classify(&frame);
//! monitor.end_inference();
//!
//! let stats = monitor.stats();
//! ```

use crate::Error;
use crate::activity::{ActivityKind, ActivityTracker};
use crate::charge::ChargeIntegrator;
use crate::clock::MonotonicClock;
use crate::config::{ActivityCharging, EnergyConfig};
use crate::inference::{InferenceCostModel, InferenceStats};
use crate::runtime;
use crate::stats::PowerStats;
use crate::units;

/// One completed inference
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InferenceEvent {
    /// Inference duration (ms)
    pub duration_ms: u64,
    /// Charge attributed to the inference (mAh)
    pub cost_mah: f64,
}

/// Software energy model for one device
pub struct EnergyMonitor<C> {
    clock: C,
    config: EnergyConfig,
    activities: ActivityTracker,
    integrator: ChargeIntegrator,
    cost_model: InferenceCostModel,
    inferences: InferenceStats,
}

impl<C> EnergyMonitor<C>
where
    C: MonotonicClock,
{
    /// Create a monitor with the bench coefficients
    ///
    /// Integration starts at the clock's current time. Charge drawn before
    /// construction is not accounted for, but the runtime estimate still
    /// divides by the time since boot.
    pub fn new(clock: C) -> Self {
        Self::build(clock, EnergyConfig::default())
    }

    /// Create a monitor with custom coefficients
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the configuration does not validate
    pub fn with_config(clock: C, config: EnergyConfig) -> Result<Self, Error<()>> {
        config.validate()?;
        Ok(Self::build(clock, config))
    }

    fn build(clock: C, config: EnergyConfig) -> Self {
        let now = clock.now_ms();

        #[cfg(feature = "defmt")]
        defmt::debug!("Energy monitor started at {} ms: {}", now, config);

        Self {
            clock,
            integrator: ChargeIntegrator::new(config.idle_current_ma, now),
            cost_model: InferenceCostModel::new(
                config.inference_base_current_ma,
                config.inference_per_ms_current_ma,
            ),
            config,
            activities: ActivityTracker::new(),
            inferences: InferenceStats::new(),
        }
    }

    /// Open an interval for `kind`
    ///
    /// Idle charge is rolled in up to now. If `kind` was already open, the
    /// stale interval is dropped.
    ///
    /// # Returns
    /// The discarded start timestamp, if any
    pub fn start(&mut self, kind: ActivityKind) -> Option<u64> {
        let now = self.clock.now_ms();
        // A restarted inference drops the stale span, which is then idle time
        let discarded = self.activities.start(kind, now);
        self.checkpoint_at(now);
        discarded
    }

    /// Close the interval for `kind`
    ///
    /// # Returns
    /// The interval duration (ms), zero if `kind` was not open
    pub fn end(&mut self, kind: ActivityKind) -> u64 {
        match kind {
            ActivityKind::Camera => self.end_activity(kind, self.config.camera_current_ma),
            ActivityKind::WirelessTransmission => {
                self.end_activity(kind, self.config.wireless_current_ma)
            }
            ActivityKind::Inference => self.end_inference().map_or(0, |event| event.duration_ms),
        }
    }

    fn end_activity(&mut self, kind: ActivityKind, incremental_ma: f32) -> u64 {
        let now = self.clock.now_ms();
        let closed = self.activities.end(kind, now);
        let charged_to = self.checkpoint_at(now);

        if self.config.activity_charging == ActivityCharging::Marginal && closed.duration_ms > 0 {
            let extra_mah = units::charge_mah(incremental_ma, closed.duration_ms);
            self.integrator.add_marginal(extra_mah, charged_to);

            #[cfg(feature = "defmt")]
            defmt::debug!(
                "{} took {} ms (est. +{} mAh)",
                kind,
                closed.duration_ms,
                extra_mah
            );
        }

        closed.duration_ms
    }

    /// Roll idle charge up to `now`, stopping at the start of an open inference
    ///
    /// # Returns
    /// The time idle charge has been integrated up to
    fn checkpoint_at(&mut self, now: u64) -> u64 {
        let target = self
            .activities
            .open_since(ActivityKind::Inference)
            .map_or(now, |started_at| started_at.min(now));
        self.integrator.checkpoint(target);
        self.integrator.last_checkpoint_ms()
    }

    /// Mark the start of a camera capture
    pub fn start_camera(&mut self) -> Option<u64> {
        self.start(ActivityKind::Camera)
    }

    /// Mark the end of a camera capture
    pub fn end_camera(&mut self) -> u64 {
        self.end(ActivityKind::Camera)
    }

    /// Mark the start of a wireless transmission
    pub fn start_wireless_transmission(&mut self) -> Option<u64> {
        self.start(ActivityKind::WirelessTransmission)
    }

    /// Mark the end of a wireless transmission
    pub fn end_wireless_transmission(&mut self) -> u64 {
        self.end(ActivityKind::WirelessTransmission)
    }

    /// Mark the start of an inference
    pub fn start_inference(&mut self) -> Option<u64> {
        self.start(ActivityKind::Inference)
    }

    /// Mark the end of an inference and charge its cost
    ///
    /// Idle integration stops at the inference start for as long as it is
    /// open. The span is charged with the closed-form cost and the
    /// integration point moves to now, so polling during the inference does
    /// not change the total.
    ///
    /// # Returns
    /// The completed inference, or `None` if no inference was running. An
    /// unmatched end is not counted and leaves the averages untouched.
    pub fn end_inference(&mut self) -> Option<InferenceEvent> {
        let now = self.clock.now_ms();
        let closed = self.activities.end(ActivityKind::Inference, now);

        if closed.started_at.is_none() {
            self.checkpoint_at(now);
            return None;
        }

        self.inferences.record(closed.duration_ms);
        let cost_mah = self.cost_model.cost_ms(closed.duration_ms);
        self.integrator.add_marginal(cost_mah, now);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "Inference took {} ms (est. {} mAh)",
            closed.duration_ms,
            cost_mah
        );

        Some(InferenceEvent {
            duration_ms: closed.duration_ms,
            cost_mah,
        })
    }

    /// Roll idle charge up to now
    ///
    /// Call this on the application's polling cadence. Nothing is lost by
    /// calling it rarely; reads checkpoint on their own.
    pub fn update(&mut self) {
        let now = self.clock.now_ms();
        self.checkpoint_at(now);
    }

    /// Total estimated charge drawn (mAh), brought up to date first
    ///
    /// An inference still running contributes nothing until it ends.
    pub fn total_usage(&mut self) -> f64 {
        self.update();
        self.integrator.accumulated_mah()
    }

    /// Charge as of the last checkpoint, without advancing it (mAh)
    pub fn accumulated_mah(&self) -> f64 {
        self.integrator.accumulated_mah()
    }

    /// Cumulative active time for `kind` (ms)
    pub fn active_time_ms(&self, kind: ActivityKind) -> u64 {
        self.activities.total_ms(kind)
    }

    /// Whether `kind` currently has an open interval
    pub fn is_active(&self, kind: ActivityKind) -> bool {
        self.activities.is_open(kind)
    }

    /// Completed inferences
    pub fn inference_count(&self) -> u32 {
        self.inferences.count()
    }

    /// Mean inference duration (ms), `0` before the first inference
    pub fn average_inference_time(&self) -> f64 {
        self.inferences.average_duration_ms()
    }

    /// Charge of an inference of mean duration (mAh), `0` before the first
    pub fn average_inference_power(&self) -> f64 {
        self.cost_model.cost(self.average_inference_time())
    }

    /// Charge the cost model attributes to an inference of `duration_ms`
    pub fn inference_cost(&self, duration_ms: f64) -> f64 {
        self.cost_model.cost(duration_ms)
    }

    /// Average current since boot (mA), `None` at the boot instant
    pub fn average_current_ma(&mut self) -> Option<f64> {
        let total = self.total_usage();
        runtime::average_current_ma(total, self.integrator.last_checkpoint_ms())
    }

    /// Projected runtime against the configured battery capacity (h)
    ///
    /// See [`estimated_remaining_hours_for`](Self::estimated_remaining_hours_for).
    pub fn estimated_remaining_hours(&mut self) -> Option<f64> {
        self.estimated_remaining_hours_for(self.config.battery_capacity_mah)
    }

    /// Projected runtime against `capacity_mah` at the average rate so far (h)
    ///
    /// # Returns
    /// `None` at the boot instant, before any charge has been drawn, or for a
    /// non-positive capacity
    pub fn estimated_remaining_hours_for(&mut self, capacity_mah: f32) -> Option<f64> {
        let total = self.total_usage();
        runtime::remaining_hours(capacity_mah, total, self.integrator.last_checkpoint_ms())
    }

    /// Snapshot every reported quantity
    ///
    /// Rates divide by the time charge is accounted up to, which trails the
    /// clock while an inference is open.
    pub fn stats(&mut self) -> PowerStats {
        let timestamp_ms = self.clock.now_ms();
        let total_mah = self.total_usage();
        let charged_to = self.integrator.last_checkpoint_ms();

        PowerStats {
            timestamp_ms,
            total_mah,
            inference_count: self.inference_count(),
            avg_inference_ms: self.average_inference_time(),
            avg_inference_mah: self.average_inference_power(),
            model_memory_kb: self.config.model_memory_kb,
            camera_active_s: units::ms_to_seconds(self.active_time_ms(ActivityKind::Camera)),
            wireless_active_s: units::ms_to_seconds(
                self.active_time_ms(ActivityKind::WirelessTransmission),
            ),
            inference_active_s: units::ms_to_seconds(
                self.active_time_ms(ActivityKind::Inference),
            ),
            avg_current_ma: runtime::average_current_ma(total_mah, charged_to),
            remaining_hours: runtime::remaining_hours(
                self.config.battery_capacity_mah,
                total_mah,
                charged_to,
            ),
        }
    }

    /// Emit a statistics snapshot on the defmt logger
    #[cfg(feature = "defmt")]
    pub fn log_stats(&mut self) {
        let stats = self.stats();
        defmt::info!("{}", stats);
    }

    /// Active configuration
    pub const fn config(&self) -> &EnergyConfig {
        &self.config
    }

    /// Borrow the clock
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Consume the monitor and return the clock
    pub fn release(self) -> C {
        self.clock
    }
}
