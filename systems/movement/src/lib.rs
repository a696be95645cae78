#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that walks slicers along a shared path.
//!
//! A [`Mover`] holds the per-slicer kinematic state while the [`Path`] stays
//! with its owner and is lent to every [`Mover::advance`] call. Each call
//! moves the slicer by exactly one fixed-length step; arrival at a waypoint is
//! detected with a distance threshold so that step lengths which do not evenly
//! divide a segment never cause oscillation around the waypoint.

use glam::DVec2;
use shadow_defend_core::Path;
use thiserror::Error;

/// Distance a slicer covers on every advance, in path units.
pub const DEFAULT_STEP_LENGTH: f64 = 1.0;

/// Distance below which a waypoint counts as reached, in path units.
pub const DEFAULT_ARRIVAL_THRESHOLD: f64 = 0.7;

/// Kinematic parameters shared by every slicer of a wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    step_length: f64,
    arrival_threshold: f64,
}

impl Config {
    /// Creates a configuration after validating both distances.
    pub fn new(step_length: f64, arrival_threshold: f64) -> Result<Self, ConfigError> {
        if !step_length.is_finite() || step_length <= 0.0 {
            return Err(ConfigError::InvalidStepLength { value: step_length });
        }
        if !arrival_threshold.is_finite() || arrival_threshold <= 0.0 {
            return Err(ConfigError::InvalidArrivalThreshold {
                value: arrival_threshold,
            });
        }

        Ok(Self {
            step_length,
            arrival_threshold,
        })
    }

    /// Distance covered by one advance.
    #[must_use]
    pub const fn step_length(&self) -> f64 {
        self.step_length
    }

    /// Distance below which a waypoint counts as reached.
    #[must_use]
    pub const fn arrival_threshold(&self) -> f64 {
        self.arrival_threshold
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            step_length: DEFAULT_STEP_LENGTH,
            arrival_threshold: DEFAULT_ARRIVAL_THRESHOLD,
        }
    }
}

/// Reasons a movement configuration may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The step length must be a positive, finite distance.
    #[error("step length must be positive and finite (received {value})")]
    InvalidStepLength {
        /// Rejected value.
        value: f64,
    },
    /// The arrival threshold must be a positive, finite distance.
    #[error("arrival threshold must be positive and finite (received {value})")]
    InvalidArrivalThreshold {
        /// Rejected value.
        value: f64,
    },
}

/// Kinematic state of a single slicer following a path.
#[derive(Clone, Debug, PartialEq)]
pub struct Mover {
    position: DVec2,
    heading: f64,
    target_index: usize,
    completed: bool,
}

impl Mover {
    /// Places a new mover on the first waypoint of `path`.
    #[must_use]
    pub fn spawn(path: &Path) -> Self {
        Self {
            position: path.start(),
            heading: 0.0,
            target_index: 0,
            completed: false,
        }
    }

    /// Current position in path coordinates.
    #[must_use]
    pub const fn position(&self) -> DVec2 {
        self.position
    }

    /// Direction of the most recent step in radians.
    #[must_use]
    pub const fn heading(&self) -> f64 {
        self.heading
    }

    /// Index of the waypoint most recently reached.
    #[must_use]
    pub const fn target_index(&self) -> usize {
        self.target_index
    }

    /// Reports whether the mover reached the final waypoint.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Advances the mover by a single step along `path`.
    ///
    /// At most one waypoint is passed per call. Once the final waypoint lies
    /// within the arrival threshold the mover is marked completed and must not
    /// be advanced again.
    pub fn advance(&mut self, path: &Path, config: &Config) {
        debug_assert!(!self.completed, "advance called on a completed mover");
        if self.completed {
            return;
        }

        let last_index = path.last_index();
        if self.target_index < last_index {
            let next = path.waypoint(self.target_index + 1);
            if self.is_near(next, config) {
                self.target_index += 1;
            }

            let destination = path.waypoint(self.target_index + 1);
            self.step_toward(destination, config);
        } else {
            let end = path.waypoint(last_index);
            if self.is_near(end, config) {
                self.completed = true;
            } else {
                self.step_toward(end, config);
            }
        }
    }

    fn is_near(&self, waypoint: DVec2, config: &Config) -> bool {
        self.position.distance(waypoint) < config.arrival_threshold
    }

    fn step_toward(&mut self, waypoint: DVec2, config: &Config) {
        // Standing exactly on the waypoint: nothing to normalise.
        let Some(direction) = (waypoint - self.position).try_normalize() else {
            return;
        };

        self.position += direction * config.step_length;
        self.heading = direction.y.atan2(direction.x);
    }
}
