//! Charge integration
//!
//! The integrator owns the accumulated charge and the timestamp it was last
//! brought up to date. Idle current is charged continuously: every
//! [`checkpoint`](ChargeIntegrator::checkpoint) rolls `idle * elapsed` into
//! the total. Activity costs arrive as one-shot marginal charges through
//! [`add_marginal`](ChargeIntegrator::add_marginal).
//!
//! The accumulated value only grows. It is kept as `f64` so a device that runs
//! for weeks still resolves sub-microamp-hour inference costs.

use crate::units;

/// Accumulated charge and the last integration point
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChargeIntegrator {
    idle_current_ma: f32,
    accumulated_mah: f64,
    last_checkpoint_ms: u64,
}

impl ChargeIntegrator {
    /// Create an integrator starting from zero charge at `now`
    ///
    /// # Arguments
    /// * `idle_current_ma` - Baseline current, charged for all elapsed time
    /// * `now` - Timestamp the integration starts from (ms)
    pub const fn new(idle_current_ma: f32, now: u64) -> Self {
        Self {
            idle_current_ma,
            accumulated_mah: 0.0,
            last_checkpoint_ms: now,
        }
    }

    /// Roll idle charge up to `now`
    ///
    /// Calling twice with the same `now` is a no-op. A `now` earlier than the
    /// last checkpoint charges nothing and leaves the checkpoint where it is.
    ///
    /// # Returns
    /// The idle charge added (mAh)
    pub fn checkpoint(&mut self, now: u64) -> f64 {
        if now < self.last_checkpoint_ms {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Checkpoint at {} ms is before last checkpoint {} ms, ignoring",
                now,
                self.last_checkpoint_ms
            );
            return 0.0;
        }

        let elapsed_ms = now - self.last_checkpoint_ms;
        let idle_mah = units::charge_mah(self.idle_current_ma, elapsed_ms);
        self.accumulated_mah += idle_mah;
        self.last_checkpoint_ms = now;
        idle_mah
    }

    /// Add a one-shot charge and move the checkpoint to `now`
    ///
    /// The span between the previous checkpoint and `now` is not charged at
    /// the idle rate; the caller accounts for it through `charge_mah`.
    /// Negative or NaN charges are dropped so the total never decreases.
    pub fn add_marginal(&mut self, charge_mah: f64, now: u64) {
        if charge_mah > 0.0 && charge_mah.is_finite() {
            self.accumulated_mah += charge_mah;
        }
        if now > self.last_checkpoint_ms {
            self.last_checkpoint_ms = now;
        }
    }

    /// Accumulated charge as of the last checkpoint (mAh)
    ///
    /// Call [`checkpoint`](Self::checkpoint) first for an up-to-date figure.
    pub const fn accumulated_mah(&self) -> f64 {
        self.accumulated_mah
    }

    /// Timestamp of the last checkpoint (ms)
    pub const fn last_checkpoint_ms(&self) -> u64 {
        self.last_checkpoint_ms
    }

    /// Idle current this integrator charges (mA)
    pub const fn idle_current_ma(&self) -> f32 {
        self.idle_current_ma
    }
}
