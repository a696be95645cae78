#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative wave state management for Shadow Defend.
//!
//! A [`Wave`] owns the slicers released onto a path, the spawn schedule and
//! the time-scale. It is mutated exclusively through [`apply`], which reports
//! what happened as [`Event`] values, and read through the [`query`] module.
//! [`WaveController`] wraps the same state behind a clock so hosts can drive
//! it with plain method calls.

mod controller;

use log::{debug, info, warn};
use shadow_defend_core::{Command, Event, Path, SlicerId, TimeScale, Timestamp, WaveStatus};
use shadow_defend_system_movement::{Config as MovementConfig, Mover};
use shadow_defend_system_spawning::{Config as SpawningConfig, SpawnDecision, SpawnSchedule};

pub use self::controller::WaveController;

/// Number of slicers released by a default wave.
pub const DEFAULT_SLICER_COUNT: u32 = 5;

/// Parameters describing a single wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveConfig {
    slicer_count: u32,
    spawning: SpawningConfig,
    movement: MovementConfig,
}

impl WaveConfig {
    /// Creates a wave configuration from its parts.
    #[must_use]
    pub const fn new(slicer_count: u32, spawning: SpawningConfig, movement: MovementConfig) -> Self {
        Self {
            slicer_count,
            spawning,
            movement,
        }
    }

    /// Number of slicers the wave releases in total.
    #[must_use]
    pub const fn slicer_count(&self) -> u32 {
        self.slicer_count
    }

    /// Spawn cadence of the wave.
    #[must_use]
    pub const fn spawning(&self) -> SpawningConfig {
        self.spawning
    }

    /// Kinematic parameters shared by the wave's slicers.
    #[must_use]
    pub const fn movement(&self) -> MovementConfig {
        self.movement
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_SLICER_COUNT,
            SpawningConfig::default(),
            MovementConfig::default(),
        )
    }
}

/// Represents the authoritative state of one wave.
#[derive(Debug)]
pub struct Wave {
    path: Path,
    movement: MovementConfig,
    schedule: SpawnSchedule,
    slicers: Vec<Slicer>,
    next_slicer_id: u32,
    time_scale: TimeScale,
    status: WaveStatus,
}

impl Wave {
    /// Creates a wave that has not started yet.
    #[must_use]
    pub fn new(path: Path, config: WaveConfig) -> Self {
        Self {
            path,
            movement: config.movement(),
            schedule: SpawnSchedule::new(config.spawning(), config.slicer_count()),
            slicers: Vec::new(),
            next_slicer_id: 0,
            time_scale: TimeScale::MIN,
            status: WaveStatus::NotStarted,
        }
    }

    fn start(&mut self, now: Timestamp, out_events: &mut Vec<Event>) {
        if self.status != WaveStatus::NotStarted {
            warn!("ignoring start request for a wave that already started");
            return;
        }

        self.status = WaveStatus::Running;
        self.schedule.begin(now);
        info!(
            "wave started with {} slicers every {:?}",
            self.schedule.remaining(),
            self.schedule.spawn_interval().as_duration()
        );
        out_events.push(Event::WaveStarted);
    }

    fn tick(&mut self, now: Timestamp, out_events: &mut Vec<Event>) {
        if self.status != WaveStatus::Running {
            return;
        }

        match self.schedule.poll(now, self.slicers.len()) {
            SpawnDecision::Bootstrap | SpawnDecision::Scheduled => self.spawn_slicer(out_events),
            SpawnDecision::Exhausted => {
                self.status = WaveStatus::Finished;
                info!("wave finished after {} slicers", self.next_slicer_id);
                out_events.push(Event::WaveFinished);
                return;
            }
            SpawnDecision::Idle => {}
        }

        self.advance_slicers();
        self.retire_completed(out_events);
    }

    fn spawn_slicer(&mut self, out_events: &mut Vec<Event>) {
        let id = SlicerId::new(self.next_slicer_id);
        self.next_slicer_id = self.next_slicer_id.saturating_add(1);

        let mover = Mover::spawn(&self.path);
        let position = mover.position();
        self.slicers.push(Slicer { id, mover });
        debug!(
            "slicer {} spawned, {} left to spawn",
            id.get(),
            self.schedule.remaining()
        );
        out_events.push(Event::SlicerSpawned {
            slicer: id,
            position,
        });
    }

    fn advance_slicers(&mut self) {
        let substeps = self.time_scale.get();
        for slicer in &mut self.slicers {
            for _ in 0..substeps {
                if slicer.mover.is_completed() {
                    break;
                }
                slicer.mover.advance(&self.path, &self.movement);
            }
        }
    }

    fn retire_completed(&mut self, out_events: &mut Vec<Event>) {
        let mut retired = Vec::new();
        self.slicers.retain(|slicer| {
            if slicer.mover.is_completed() {
                retired.push(slicer.id);
                false
            } else {
                true
            }
        });

        for slicer in retired {
            debug!("slicer {} completed the path", slicer.get());
            out_events.push(Event::SlicerCompleted { slicer });
        }
    }

    fn speed_up(&mut self, out_events: &mut Vec<Event>) {
        self.time_scale = self.time_scale.faster();
        self.schedule.accelerate();
        self.announce_time_scale(out_events);
    }

    fn slow_down(&mut self, out_events: &mut Vec<Event>) {
        let Some(slower) = self.time_scale.slower() else {
            return;
        };

        self.time_scale = slower;
        self.schedule.decelerate();
        self.announce_time_scale(out_events);
    }

    fn announce_time_scale(&self, out_events: &mut Vec<Event>) {
        debug!(
            "time-scale {} with spawn interval {:?}",
            self.time_scale.get(),
            self.schedule.spawn_interval().as_duration()
        );
        out_events.push(Event::TimeScaleChanged {
            time_scale: self.time_scale,
            spawn_interval: self.schedule.spawn_interval(),
        });
    }
}

#[derive(Clone, Debug)]
struct Slicer {
    id: SlicerId,
    mover: Mover,
}

/// Applies the provided command to the wave, mutating state deterministically.
pub fn apply(wave: &mut Wave, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Start { now } => wave.start(now, out_events),
        Command::Tick { now } => wave.tick(now, out_events),
        Command::SpeedUp => wave.speed_up(out_events),
        Command::SlowDown => wave.slow_down(out_events),
    }
}

/// Query functions that provide read-only access to the wave state.
pub mod query {
    use shadow_defend_core::{
        SlicerSnapshot, SlicerView, SpawnInterval, TimeScale, Timestamp, WaveStatus,
    };

    use super::Wave;

    /// Current lifecycle state of the wave.
    #[must_use]
    pub fn status(wave: &Wave) -> WaveStatus {
        wave.status
    }

    /// Reports whether the wave has been started.
    #[must_use]
    pub fn has_started(wave: &Wave) -> bool {
        wave.status.has_started()
    }

    /// Reports whether the wave has finished.
    #[must_use]
    pub fn is_finished(wave: &Wave) -> bool {
        wave.status.is_finished()
    }

    /// Multiplier applied to movement sub-steps per tick.
    #[must_use]
    pub fn time_scale(wave: &Wave) -> TimeScale {
        wave.time_scale
    }

    /// Delay between two scheduled spawns.
    #[must_use]
    pub fn spawn_interval(wave: &Wave) -> SpawnInterval {
        wave.schedule.spawn_interval()
    }

    /// Instant the spawn timer is currently measured from.
    #[must_use]
    pub fn last_spawn(wave: &Wave) -> Timestamp {
        wave.schedule.last_spawn()
    }

    /// Number of slicers still waiting to be spawned.
    #[must_use]
    pub fn remaining_to_spawn(wave: &Wave) -> u32 {
        wave.schedule.remaining()
    }

    /// Number of slicers currently on the path.
    #[must_use]
    pub fn active_count(wave: &Wave) -> usize {
        wave.slicers.len()
    }

    /// Captures a read-only view of the slicers currently on the path.
    #[must_use]
    pub fn slicer_view(wave: &Wave) -> SlicerView {
        let snapshots = wave
            .slicers
            .iter()
            .map(|slicer| SlicerSnapshot {
                id: slicer.id,
                position: slicer.mover.position(),
                heading: slicer.mover.heading(),
                target_index: slicer.mover.target_index(),
            })
            .collect();
        SlicerView::from_snapshots(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn wave_with_quota(quota: u32) -> Wave {
        let path = Path::new(vec![DVec2::ZERO, DVec2::new(10.0, 0.0)]).expect("valid path");
        Wave::new(
            path,
            WaveConfig::new(quota, SpawningConfig::default(), MovementConfig::default()),
        )
    }

    #[test]
    fn slicer_ids_are_allocated_sequentially() {
        let mut wave = wave_with_quota(3);
        let mut events = Vec::new();
        wave.spawn_slicer(&mut events);
        wave.spawn_slicer(&mut events);

        let ids: Vec<_> = wave.slicers.iter().map(|slicer| slicer.id.get()).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn retire_keeps_unfinished_slicers() {
        let mut wave = wave_with_quota(2);
        let mut events = Vec::new();
        wave.spawn_slicer(&mut events);
        wave.spawn_slicer(&mut events);
        events.clear();

        wave.retire_completed(&mut events);

        assert!(events.is_empty());
        assert_eq!(query::active_count(&wave), 2);
    }
}
