#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that paces slicers entering the path.

use shadow_defend_core::{SpawnInterval, Timestamp};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Config {
    spawn_interval: SpawnInterval,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence.
    #[must_use]
    pub const fn new(spawn_interval: SpawnInterval) -> Self {
        Self { spawn_interval }
    }

    /// Delay between two scheduled spawns.
    #[must_use]
    pub const fn spawn_interval(&self) -> SpawnInterval {
        self.spawn_interval
    }
}

/// Outcome of polling the schedule once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnDecision {
    /// The path is empty and slicers remain: spawn without waiting.
    Bootstrap,
    /// The interval elapsed and slicers remain: spawn and restart the timer.
    Scheduled,
    /// The quota is spent and the path is empty: the wave is over.
    Exhausted,
    /// Nothing to do this tick.
    Idle,
}

impl SpawnDecision {
    /// Reports whether the decision requires a slicer to be spawned.
    #[must_use]
    pub const fn spawns(self) -> bool {
        matches!(self, Self::Bootstrap | Self::Scheduled)
    }
}

/// Spawn quota and timer of a single wave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnSchedule {
    spawn_interval: SpawnInterval,
    remaining: u32,
    last_spawn: Timestamp,
}

impl SpawnSchedule {
    /// Creates a schedule that will release `quota` slicers.
    #[must_use]
    pub const fn new(config: Config, quota: u32) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            remaining: quota,
            last_spawn: Timestamp::ZERO,
        }
    }

    /// Anchors the spawn timer at `now`.
    pub fn begin(&mut self, now: Timestamp) {
        self.last_spawn = now;
    }

    /// Decides what the wave should do this tick and records the outcome.
    ///
    /// Rules are checked in priority order and at most one applies. A
    /// bootstrap spawn leaves the timer untouched; a scheduled spawn restarts
    /// it at `now`.
    pub fn poll(&mut self, now: Timestamp, active: usize) -> SpawnDecision {
        let elapsed = now.saturating_duration_since(self.last_spawn);

        let decision = if active == 0 && self.remaining > 0 {
            SpawnDecision::Bootstrap
        } else if elapsed >= self.spawn_interval.as_duration() && self.remaining > 0 {
            SpawnDecision::Scheduled
        } else if active == 0 && self.remaining == 0 {
            SpawnDecision::Exhausted
        } else {
            SpawnDecision::Idle
        };

        if decision.spawns() {
            self.remaining -= 1;
        }
        if decision == SpawnDecision::Scheduled {
            self.last_spawn = now;
        }

        decision
    }

    /// Halves the spawn interval, truncating toward the one-nanosecond floor.
    pub fn accelerate(&mut self) {
        self.spawn_interval = self.spawn_interval.halved();
    }

    /// Doubles the spawn interval.
    pub fn decelerate(&mut self) {
        self.spawn_interval = self.spawn_interval.doubled();
    }

    /// Number of slicers still waiting to be spawned.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Delay between two scheduled spawns.
    #[must_use]
    pub const fn spawn_interval(&self) -> SpawnInterval {
        self.spawn_interval
    }

    /// Instant of the most recent scheduled spawn, or of the wave start.
    #[must_use]
    pub const fn last_spawn(&self) -> Timestamp {
        self.last_spawn
    }
}
