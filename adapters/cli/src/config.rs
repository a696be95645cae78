//! Level description loaded from TOML and the command-line overrides applied on top.

use std::{fs, path::Path as FsPath, time::Duration};

use anyhow::{Context, Result};
use glam::DVec2;
use serde::Deserialize;
use shadow_defend_core::{Path, SpawnInterval};
use shadow_defend_system_movement::{
    Config as MovementConfig, DEFAULT_ARRIVAL_THRESHOLD, DEFAULT_STEP_LENGTH,
};
use shadow_defend_system_spawning::Config as SpawningConfig;
use shadow_defend_world::{WaveConfig, DEFAULT_SLICER_COUNT};

const BUILTIN_LEVEL: &str = include_str!("../levels/default.toml");

/// Raw level file contents.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LevelConfig {
    #[serde(default = "default_slicers")]
    slicers: u32,
    #[serde(default = "default_spawn_interval_ms")]
    spawn_interval_ms: u64,
    #[serde(default = "default_step_length")]
    step_length: f64,
    #[serde(default = "default_arrival_threshold")]
    arrival_threshold: f64,
    waypoints: Vec<[f64; 2]>,
}

/// Values supplied on the command line that take precedence over the level file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct LevelOverrides {
    pub(crate) slicers: Option<u32>,
    pub(crate) spawn_interval_ms: Option<u64>,
    pub(crate) step_length: Option<f64>,
    pub(crate) arrival_threshold: Option<f64>,
}

/// Validated level ready to drive a wave.
#[derive(Clone, Debug)]
pub(crate) struct Level {
    pub(crate) path: Path,
    pub(crate) wave: WaveConfig,
}

impl LevelConfig {
    /// Level shipped with the binary.
    pub(crate) fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_LEVEL).context("built-in level is malformed")
    }

    /// Reads a level file from disk.
    pub(crate) fn load(path: &FsPath) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read level file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("failed to parse level file {}", path.display()))
    }

    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub(crate) fn apply_overrides(&mut self, overrides: LevelOverrides) {
        if let Some(slicers) = overrides.slicers {
            self.slicers = slicers;
        }
        if let Some(spawn_interval_ms) = overrides.spawn_interval_ms {
            self.spawn_interval_ms = spawn_interval_ms;
        }
        if let Some(step_length) = overrides.step_length {
            self.step_length = step_length;
        }
        if let Some(arrival_threshold) = overrides.arrival_threshold {
            self.arrival_threshold = arrival_threshold;
        }
    }

    /// Validates the raw values and converts them into simulation types.
    pub(crate) fn build(&self) -> Result<Level> {
        let waypoints = self
            .waypoints
            .iter()
            .map(|&[x, y]| DVec2::new(x, y))
            .collect();
        let path = Path::new(waypoints).context("level path is invalid")?;
        let movement = MovementConfig::new(self.step_length, self.arrival_threshold)
            .context("level movement parameters are invalid")?;
        let spawning = SpawningConfig::new(SpawnInterval::from_duration(Duration::from_millis(
            self.spawn_interval_ms,
        )));

        Ok(Level {
            path,
            wave: WaveConfig::new(self.slicers, spawning, movement),
        })
    }
}

fn default_slicers() -> u32 {
    DEFAULT_SLICER_COUNT
}

fn default_spawn_interval_ms() -> u64 {
    SpawnInterval::DEFAULT.as_nanos() / 1_000_000
}

fn default_step_length() -> f64 {
    DEFAULT_STEP_LENGTH
}

fn default_arrival_threshold() -> f64 {
    DEFAULT_ARRIVAL_THRESHOLD
}
