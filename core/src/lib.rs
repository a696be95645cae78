#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Shadow Defend engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative wave state, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then reports [`Event`] values describing what
//! happened. Time never leaks in implicitly: every timestamp flows through a
//! [`Clock`] so that replays stay deterministic.

mod clock;

use std::{num::NonZeroU32, time::Duration};

use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use self::clock::{Clock, ManualClock, MonotonicClock};

/// Number of nanoseconds contained in one second.
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Commands that express all permissible wave mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Starts the wave and anchors the spawn timer at the provided instant.
    Start {
        /// Monotonic instant at which the wave started.
        now: Timestamp,
    },
    /// Advances the wave by one host tick.
    Tick {
        /// Monotonic instant observed by the host for this tick.
        now: Timestamp,
    },
    /// Raises the time-scale by one and halves the spawn interval.
    SpeedUp,
    /// Lowers the time-scale by one and doubles the spawn interval.
    SlowDown,
}

/// Events reported by the wave after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the wave left the not-started state.
    WaveStarted,
    /// Confirms that a slicer entered the path.
    SlicerSpawned {
        /// Identifier assigned to the newly spawned slicer.
        slicer: SlicerId,
        /// Position the slicer occupies after spawning.
        position: DVec2,
    },
    /// Reports that a slicer reached the end of the path and left the wave.
    SlicerCompleted {
        /// Identifier of the slicer that completed the path.
        slicer: SlicerId,
    },
    /// Announces a new time-scale together with the rescaled spawn interval.
    TimeScaleChanged {
        /// Multiplier that became active.
        time_scale: TimeScale,
        /// Spawn interval that became active.
        spawn_interval: SpawnInterval,
    },
    /// Announces that the quota is exhausted and no slicer remains.
    WaveFinished,
}

/// Lifecycle of a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveStatus {
    /// The wave has been constructed but not started.
    NotStarted,
    /// The wave spawns and advances slicers on every tick.
    Running,
    /// The wave spawned its full quota and every slicer left the path.
    Finished,
}

impl WaveStatus {
    /// Reports whether the wave ever left the not-started state.
    #[must_use]
    pub const fn has_started(self) -> bool {
        !matches!(self, Self::NotStarted)
    }

    /// Reports whether the wave reached its terminal state.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }
}

/// Unique identifier assigned to a slicer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlicerId(u32);

impl SlicerId {
    /// Creates a new slicer identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Instant on a monotonic clock, measured from the clock's own origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(Duration);

impl Timestamp {
    /// Origin of the clock.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Creates a timestamp located `offset` after the clock origin.
    #[must_use]
    pub const fn from_offset(offset: Duration) -> Self {
        Self(offset)
    }

    /// Creates a timestamp from whole nanoseconds since the clock origin.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(Duration::from_nanos(nanos))
    }

    /// Offset of the timestamp from the clock origin.
    #[must_use]
    pub const fn offset(&self) -> Duration {
        self.0
    }

    /// Time elapsed since `earlier`, or zero when `earlier` lies in the future.
    #[must_use]
    pub fn saturating_duration_since(self, earlier: Self) -> Duration {
        self.0.saturating_sub(earlier.0)
    }

    /// Returns the timestamp shifted forward by `delta`.
    #[must_use]
    pub fn saturating_add(self, delta: Duration) -> Self {
        Self(self.0.saturating_add(delta))
    }
}

/// Real-time delay between two scheduled spawns, stored as whole nanoseconds.
///
/// Halving truncates toward zero and never drops below one nanosecond, so a
/// halve/double pair only round-trips while the stored value stays even.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpawnInterval {
    nanos: u64,
}

impl SpawnInterval {
    /// Smallest representable interval.
    pub const MIN: Self = Self { nanos: 1 };

    /// Default delay between two slicers.
    pub const DEFAULT: Self = Self {
        nanos: 5 * NANOS_PER_SECOND,
    };

    /// Creates an interval from whole nanoseconds, clamped to [`Self::MIN`].
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        if nanos == 0 {
            Self::MIN
        } else {
            Self { nanos }
        }
    }

    /// Creates an interval from a duration, saturating beyond `u64` nanoseconds.
    #[must_use]
    pub fn from_duration(duration: Duration) -> Self {
        Self::from_nanos(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX))
    }

    /// Number of nanoseconds in the interval.
    #[must_use]
    pub const fn as_nanos(&self) -> u64 {
        self.nanos
    }

    /// Interval expressed as a [`Duration`].
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        Duration::from_nanos(self.nanos)
    }

    /// Returns half of the interval, truncated and floored at [`Self::MIN`].
    #[must_use]
    pub const fn halved(self) -> Self {
        Self::from_nanos(self.nanos / 2)
    }

    /// Returns twice the interval, saturating at `u64::MAX` nanoseconds.
    #[must_use]
    pub const fn doubled(self) -> Self {
        Self::from_nanos(self.nanos.saturating_mul(2))
    }
}

impl Default for SpawnInterval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Integer multiplier applied to the number of movement sub-steps per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeScale(NonZeroU32);

impl TimeScale {
    /// Real-time pace; the floor of every time-scale.
    pub const MIN: Self = Self(NonZeroU32::MIN);

    /// Creates a time-scale, returning `None` for zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Number of movement sub-steps applied per tick.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0.get()
    }

    /// Returns the next faster time-scale, saturating at `u32::MAX`.
    #[must_use]
    pub const fn faster(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Returns the next slower time-scale, or `None` when already at [`Self::MIN`].
    #[must_use]
    pub const fn slower(self) -> Option<Self> {
        Self::new(self.0.get() - 1)
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::MIN
    }
}

/// Reasons a path may be rejected at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// A path needs at least one waypoint.
    #[error("path must contain at least one waypoint")]
    Empty,
    /// Waypoint coordinates must be finite numbers.
    #[error("waypoint {index} has a non-finite coordinate")]
    NonFiniteWaypoint {
        /// Position of the offending waypoint within the path.
        index: usize,
    },
}

/// Ordered, non-empty, immutable polyline that slicers travel along.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    waypoints: Vec<DVec2>,
}

impl Path {
    /// Validates the provided waypoints and wraps them into a path.
    pub fn new(waypoints: Vec<DVec2>) -> Result<Self, PathError> {
        if waypoints.is_empty() {
            return Err(PathError::Empty);
        }

        if let Some(index) = waypoints.iter().position(|point| !point.is_finite()) {
            return Err(PathError::NonFiniteWaypoint { index });
        }

        Ok(Self { waypoints })
    }

    /// Waypoints in travel order.
    #[must_use]
    pub fn waypoints(&self) -> &[DVec2] {
        &self.waypoints
    }

    /// Number of waypoints; never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always `false`; provided for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Index of the final waypoint.
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// First waypoint, where every slicer spawns.
    #[must_use]
    pub fn start(&self) -> DVec2 {
        self.waypoint(0)
    }

    /// Waypoint at `index`, clamped to the final waypoint when out of range.
    #[must_use]
    pub fn waypoint(&self, index: usize) -> DVec2 {
        let clamped = index.min(self.last_index());
        self.waypoints.get(clamped).copied().unwrap_or(DVec2::ZERO)
    }
}

/// Immutable representation of a single slicer's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlicerSnapshot {
    /// Unique identifier assigned to the slicer.
    pub id: SlicerId,
    /// Position of the slicer in path coordinates.
    pub position: DVec2,
    /// Direction of travel in radians, suitable for sprite rotation.
    pub heading: f64,
    /// Index of the waypoint the slicer most recently reached.
    pub target_index: usize,
}

/// Read-only snapshot describing all active slicers of a wave.
#[derive(Clone, Debug, Default)]
pub struct SlicerView {
    snapshots: Vec<SlicerSnapshot>,
}

impl SlicerView {
    /// Creates a new slicer view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<SlicerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured slicer snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &SlicerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured slicers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no slicer is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<SlicerSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{Path, PathError, SlicerId, SpawnInterval, TimeScale, WaveStatus};
    use glam::DVec2;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn slicer_id_round_trips_through_bincode() {
        assert_round_trip(&SlicerId::new(7));
    }

    #[test]
    fn wave_status_round_trips_through_bincode() {
        assert_round_trip(&WaveStatus::Running);
    }

    #[test]
    fn time_scale_round_trips_through_bincode() {
        assert_round_trip(&TimeScale::MIN.faster().faster());
    }

    #[test]
    fn empty_path_is_rejected() {
        assert_eq!(Path::new(Vec::new()), Err(PathError::Empty));
    }

    #[test]
    fn non_finite_waypoint_is_rejected() {
        let waypoints = vec![DVec2::ZERO, DVec2::new(f64::NAN, 1.0)];
        assert_eq!(
            Path::new(waypoints),
            Err(PathError::NonFiniteWaypoint { index: 1 })
        );
    }

    #[test]
    fn waypoint_lookup_clamps_to_final_point() {
        let path = Path::new(vec![DVec2::ZERO, DVec2::new(3.0, 4.0)]).expect("valid path");
        assert_eq!(path.last_index(), 1);
        assert_eq!(path.waypoint(5), DVec2::new(3.0, 4.0));
    }

    #[test]
    fn single_point_path_starts_and_ends_on_its_waypoint() {
        let path = Path::new(vec![DVec2::new(1.0, 1.0)]).expect("valid path");
        assert_eq!(path.last_index(), 0);
        assert_eq!(path.start(), DVec2::new(1.0, 1.0));
        assert_eq!(path.waypoint(1), path.start());
    }

    #[test]
    fn halving_truncates_and_floors_at_one_nanosecond() {
        assert_eq!(SpawnInterval::from_nanos(7).halved().as_nanos(), 3);
        assert_eq!(SpawnInterval::MIN.halved(), SpawnInterval::MIN);
        assert_eq!(SpawnInterval::from_nanos(0), SpawnInterval::MIN);
    }

    #[test]
    fn odd_interval_does_not_survive_halve_double_cycle() {
        let odd = SpawnInterval::from_nanos(5);
        assert_eq!(odd.halved().doubled().as_nanos(), 4);

        let even = SpawnInterval::DEFAULT;
        assert_eq!(even.halved().doubled(), even);
    }

    #[test]
    fn time_scale_never_drops_below_one() {
        assert_eq!(TimeScale::MIN.slower(), None);
        assert_eq!(TimeScale::MIN.faster().slower(), Some(TimeScale::MIN));
        assert_eq!(TimeScale::new(0), None);
    }
}
