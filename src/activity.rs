//! Activity interval tracking
//!
//! Each [`ActivityKind`] has at most one open interval and a cumulative
//! active duration. Intervals are opened with [`ActivityTracker::start`] and
//! folded into the total by [`ActivityTracker::end`].
//!
//! Callers are expected to alternate start/end per kind. The tracker does not
//! enforce it:
//! - A second `start` overwrites the open timestamp. The unclosed span is
//!   lost rather than counted twice.
//! - An `end` with nothing open adds zero.
//! - An `end` timestamp earlier than the start adds zero.

/// Number of tracked activity kinds
pub const ACTIVITY_KIND_COUNT: usize = 3;

/// Power-relevant device activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActivityKind {
    /// Camera frame capture
    Camera = 0,
    /// Radio transmission (Wi-Fi upload)
    WirelessTransmission = 1,
    /// On-device model inference
    Inference = 2,
}

impl ActivityKind {
    /// All kinds, in index order
    pub const ALL: [Self; ACTIVITY_KIND_COUNT] =
        [Self::Camera, Self::WirelessTransmission, Self::Inference];

    /// Slot index used by the tracker
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short label for reports
    pub const fn label(self) -> &'static str {
        match self {
            Self::Camera => "Camera",
            Self::WirelessTransmission => "WiFi TX",
            Self::Inference => "ML inference",
        }
    }
}

/// Result of closing an interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClosedInterval {
    /// Start timestamp, `None` when no interval was open
    pub started_at: Option<u64>,
    /// Duration added to the total (ms)
    pub duration_ms: u64,
}

impl ClosedInterval {
    /// True when the end had a matching start
    pub const fn was_open(&self) -> bool {
        self.started_at.is_some()
    }
}

/// Per-kind open intervals and cumulative totals
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActivityTracker {
    open: [Option<u64>; ACTIVITY_KIND_COUNT],
    totals_ms: [u64; ACTIVITY_KIND_COUNT],
}

impl ActivityTracker {
    /// Create a tracker with every kind closed and zero totals
    pub const fn new() -> Self {
        Self {
            open: [None; ACTIVITY_KIND_COUNT],
            totals_ms: [0; ACTIVITY_KIND_COUNT],
        }
    }

    /// Open an interval for `kind` at `now`
    ///
    /// # Returns
    /// The discarded start timestamp if `kind` was already open
    pub fn start(&mut self, kind: ActivityKind, now: u64) -> Option<u64> {
        let previous = self.open[kind.index()].replace(now);

        #[cfg(feature = "defmt")]
        {
            if let Some(stale) = previous {
                defmt::warn!(
                    "{}: start while open, discarding interval started at {} ms",
                    kind,
                    stale
                );
            }
        }

        previous
    }

    /// Close the interval for `kind` at `now` and add it to the total
    pub fn end(&mut self, kind: ActivityKind, now: u64) -> ClosedInterval {
        let started_at = self.open[kind.index()].take();

        let duration_ms = match started_at {
            Some(start) => {
                #[cfg(feature = "defmt")]
                {
                    if now < start {
                        defmt::warn!("{}: clock went backwards ({} < {})", kind, now, start);
                    }
                }
                now.saturating_sub(start)
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::debug!("{}: end without start", kind);
                0
            }
        };

        let total = &mut self.totals_ms[kind.index()];
        *total = total.saturating_add(duration_ms);

        ClosedInterval {
            started_at,
            duration_ms,
        }
    }

    /// Cumulative active time for `kind` (ms)
    pub const fn total_ms(&self, kind: ActivityKind) -> u64 {
        self.totals_ms[kind.index()]
    }

    /// Whether `kind` currently has an open interval
    pub const fn is_open(&self, kind: ActivityKind) -> bool {
        self.open[kind.index()].is_some()
    }

    /// Start timestamp of the open interval for `kind`
    pub const fn open_since(&self, kind: ActivityKind) -> Option<u64> {
        self.open[kind.index()]
    }
}
