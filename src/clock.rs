//! Monotonic time sources
//!
//! The monitor never reads a global timer. It is handed a [`MonotonicClock`]
//! at construction and asks it for the current time whenever an activity
//! starts, ends, or a report is requested.
//!
//! The value returned is milliseconds since boot. The runtime estimator uses
//! it directly as the elapsed-time divisor, so a clock that starts counting
//! from something other than boot skews the average rate accordingly.

/// Monotonic millisecond counter
///
/// Implementations must never go backwards while the system runs. The
/// monitor tolerates a clock that does (durations clamp to zero), but the
/// resulting estimates are meaningless.
pub trait MonotonicClock {
    /// Milliseconds elapsed since boot
    fn now_ms(&self) -> u64;
}

impl<C: MonotonicClock + ?Sized> MonotonicClock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Adapter turning any `Fn() -> u64` into a clock
///
/// Handy for HALs that expose a free-standing `millis()` function.
///
/// # Example
/// ```ignore
/// let clock = FnClock::new(|| hal::time::millis());
/// let mut monitor = EnergyMonitor::new(clock);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnClock<F> {
    now: F,
}

impl<F> FnClock<F>
where
    F: Fn() -> u64,
{
    /// Wrap a millisecond source
    pub const fn new(now: F) -> Self {
        Self { now }
    }
}

impl<F> MonotonicClock for FnClock<F>
where
    F: Fn() -> u64,
{
    fn now_ms(&self) -> u64 {
        (self.now)()
    }
}

/// Clock backed by the embassy time driver
///
/// `embassy_time::Instant` counts from driver start, which on every supported
/// HAL coincides with boot.
///
/// Only exercised on target: host tests have no embassy time driver linked,
/// so they drive the monitor through [`FnClock`] or a test clock instead.
#[cfg(feature = "embassy-time")]
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl MonotonicClock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}
