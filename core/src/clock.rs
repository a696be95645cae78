use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use crate::Timestamp;

/// Source of monotonic timestamps consumed by the wave.
pub trait Clock {
    /// Current instant on the clock.
    fn now(&self) -> Timestamp;
}

/// Clock backed by [`Instant`], immune to wall-clock adjustments.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose origin is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_offset(self.origin.elapsed())
    }
}

/// Manually driven clock for deterministic replays and headless runs.
///
/// Clones share the same counter, so a test can keep one handle while the
/// wave owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock parked at its origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `delta`, saturating at `u64::MAX` nanoseconds.
    pub fn advance(&self, delta: Duration) {
        let delta = u64::try_from(delta.as_nanos()).unwrap_or(u64::MAX);
        let mut current = self.nanos.load(Ordering::Relaxed);
        loop {
            let next = current.saturating_add(delta);
            match self.nanos.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }
    }

    /// Parks the clock at `timestamp`. Moving backwards is ignored.
    pub fn set(&self, timestamp: Timestamp) {
        let target = u64::try_from(timestamp.offset().as_nanos()).unwrap_or(u64::MAX);
        let _ = self.nanos.fetch_max(target, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_nanos(self.nanos.load(Ordering::Relaxed))
    }
}
