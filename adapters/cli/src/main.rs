#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Shadow Defend wave.

mod config;
mod headless;
mod logging;
mod simulation;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use shadow_defend_core::{Clock, ManualClock, MonotonicClock};
use shadow_defend_rendering::{
    Color, HudPresentation, PathPresentation, Presentation, RenderingBackend, Scene,
};
use shadow_defend_rendering_macroquad::MacroquadBackend;
use shadow_defend_world::WaveController;

use self::{
    config::{Level, LevelConfig, LevelOverrides},
    headless::{HeadlessBackend, ScriptedSignal},
    simulation::Host,
};

const WINDOW_TITLE: &str = "Shadow Defend";
const PATH_THICKNESS: f32 = 12.0;

/// Runs a single wave of slicers along a path.
#[derive(Debug, Parser)]
#[command(name = "shadow-defend", author, version)]
struct CliArgs {
    /// TOML level file with the waypoints and wave parameters.
    #[arg(long, value_name = "FILE")]
    level: Option<PathBuf>,

    /// Number of slicers released by the wave.
    #[arg(long)]
    slicers: Option<u32>,

    /// Delay between scheduled spawns, in milliseconds.
    #[arg(long, value_name = "MS")]
    spawn_interval_ms: Option<u64>,

    /// Distance a slicer covers per movement step.
    #[arg(long)]
    step_length: Option<f64>,

    /// Distance below which a waypoint counts as reached.
    #[arg(long)]
    arrival_threshold: Option<f64>,

    /// Run without a window, driven by a simulated clock.
    #[arg(long)]
    headless: bool,

    /// Frames per simulated second in headless mode.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    frame_rate: u32,

    /// Headless frames to run before giving up on the wave finishing.
    #[arg(long, default_value_t = 1_000_000, value_parser = clap::value_parser!(u64).range(1..))]
    max_frames: u64,

    /// Scripted headless input as FRAME:SIGNAL (start, speed-up or slow-down). Repeatable.
    #[arg(long = "signal", value_name = "FRAME:SIGNAL")]
    signals: Vec<ScriptedSignal>,

    /// Render as fast as possible instead of synchronising with the display.
    #[arg(long)]
    no_vsync: bool,

    /// Print the frame rate once per second.
    #[arg(long)]
    show_fps: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

impl CliArgs {
    fn overrides(&self) -> LevelOverrides {
        LevelOverrides {
            slicers: self.slicers,
            spawn_interval_ms: self.spawn_interval_ms,
            step_length: self.step_length,
            arrival_threshold: self.arrival_threshold,
        }
    }
}

/// Entry point for the Shadow Defend command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    logging::init(args.verbose);

    let mut level_config = match &args.level {
        Some(path) => LevelConfig::load(path)?,
        None => LevelConfig::builtin()?,
    };
    level_config.apply_overrides(args.overrides());
    let level = level_config.build()?;
    info!(
        "level with {} waypoints, {} slicers",
        level.path.len(),
        level.wave.slicer_count()
    );

    if args.headless {
        let clock = ManualClock::new();
        let backend = HeadlessBackend::new(args.frame_rate, args.max_frames, args.signals);
        run(backend, level, clock.clone(), move |dt| clock.advance(dt))
    } else {
        let backend = MacroquadBackend::new()
            .with_vsync(!args.no_vsync)
            .with_show_fps(args.show_fps);
        run(backend, level, MonotonicClock::new(), |_| {})
    }
}

/// Wires a wave to the backend and runs it until the wave finishes.
///
/// `after_frame` receives each frame delta once the frame has been simulated.
fn run<B, C, A>(backend: B, level: Level, clock: C, mut after_frame: A) -> Result<()>
where
    B: RenderingBackend,
    C: Clock + 'static,
    A: FnMut(std::time::Duration) + 'static,
{
    let path = PathPresentation::new(
        level.path.waypoints(),
        PATH_THICKNESS,
        Color::from_rgb_u8(181, 155, 109),
    )
    .context("failed to describe the path")?;
    let mut scene = Scene::new(path, Vec::new(), HudPresentation::default());

    let mut host = Host::new(WaveController::new(level.path, level.wave, clock));
    host.populate_scene(&mut scene);

    let presentation = Presentation::new(WINDOW_TITLE, Color::from_rgb_u8(54, 89, 46), scene);
    backend.run(presentation, move |dt, input, scene| {
        let control = host.frame(input, scene);
        after_frame(dt);
        control
    })
}
