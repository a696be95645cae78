#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Shadow Defend.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_pressed, KeyCode};
use macroquad::math::Vec2 as MacroquadVec2;
use shadow_defend_rendering::{
    Color, FrameControl, FrameInput, HudPresentation, PathPresentation, Presentation,
    RenderingBackend, Scene, SlicerPresentation,
};
use std::time::Duration;

/// Width of the window requested from the platform, in pixels.
pub const WINDOW_WIDTH: i32 = 1024;
/// Height of the window requested from the platform, in pixels.
pub const WINDOW_HEIGHT: i32 = 768;

const SLICER_SIZE: f32 = 18.0;
const SCREEN_MARGIN: f32 = 32.0;
const HUD_FONT_SIZE: f32 = 24.0;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` closes the window.
    quit_requested: bool,
    /// `S` starts the wave.
    start_wave: bool,
    /// `L` speeds the wave up.
    speed_up: bool,
    /// `K` slows the wave down.
    slow_down: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            start_wave: is_key_pressed(KeyCode::S),
            speed_up: is_key_pressed(KeyCode::L),
            slow_down: is_key_pressed(KeyCode::K),
        }
    }

    fn frame_input(self) -> FrameInput {
        FrameInput {
            start_wave: self.start_wave,
            speed_up: self.speed_up,
            slow_down: self.slow_down,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints the frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Counts rendered frames and reports the average once a second has elapsed.
#[derive(Clone, Copy, Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameControl + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                if update_scene(frame_dt, keyboard.frame_input(), &mut scene)
                    == FrameControl::Exit
                {
                    break;
                }

                macroquad::window::clear_background(background);
                let metrics = SceneMetrics::from_path(
                    &scene.path,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_path(&scene.path, &metrics);
                draw_slicers(&scene.slicers, &metrics, scene.path.color.lighten(0.5));
                draw_hud(&scene.hud, background);

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        println!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps world coordinates onto the screen.
///
/// Paths that already fit inside the window are drawn in their own pixel
/// coordinates. Larger paths are scaled down and centred.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
}

impl SceneMetrics {
    const IDENTITY: Self = Self {
        scale: 1.0,
        offset: Vec2::ZERO,
    };

    fn from_path(path: &PathPresentation, screen_width: f32, screen_height: f32) -> Self {
        let Some((min, max)) = path.bounds() else {
            return Self::IDENTITY;
        };

        let fits = min.x >= 0.0 && min.y >= 0.0 && max.x <= screen_width && max.y <= screen_height;
        if fits {
            return Self::IDENTITY;
        }

        let available = Vec2::new(
            (screen_width - 2.0 * SCREEN_MARGIN).max(1.0),
            (screen_height - 2.0 * SCREEN_MARGIN).max(1.0),
        );
        let extent = (max - min).max(Vec2::splat(f32::EPSILON));
        let scale = (available.x / extent.x).min(available.y / extent.y);
        let scaled = extent * scale;
        let centre = Vec2::new(screen_width, screen_height) * 0.5;

        Self {
            scale,
            offset: centre - scaled * 0.5 - min * scale,
        }
    }

    fn to_screen(self, world: Vec2) -> Vec2 {
        world * self.scale + self.offset
    }
}

/// Corners of the isosceles triangle used to draw a slicer.
///
/// The apex points along `heading`, measured in radians from the positive x
/// axis towards positive y.
fn slicer_triangle(center: Vec2, heading: f32, size: f32) -> [Vec2; 3] {
    let forward = Vec2::from_angle(heading);
    let side = forward.perp();
    let half = size * 0.5;

    [
        center + forward * half,
        center - forward * half + side * half * 0.8,
        center - forward * half - side * half * 0.8,
    ]
}

fn draw_path(path: &PathPresentation, metrics: &SceneMetrics) {
    let color = to_macroquad_color(path.color);
    let thickness = path.thickness * metrics.scale;

    for segment in path.waypoints.windows(2) {
        let start = metrics.to_screen(segment[0]);
        let end = metrics.to_screen(segment[1]);
        macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, thickness, color);
    }
    for waypoint in &path.waypoints {
        let point = metrics.to_screen(*waypoint);
        macroquad::shapes::draw_circle(point.x, point.y, thickness * 0.5, color);
    }
}

fn draw_slicers(slicers: &[SlicerPresentation], metrics: &SceneMetrics, color: Color) {
    let color = to_macroquad_color(color);
    let size = (SLICER_SIZE * metrics.scale).max(4.0);

    for slicer in slicers {
        let center = metrics.to_screen(slicer.position);
        let [apex, left, right] = slicer_triangle(center, slicer.heading, size);
        macroquad::shapes::draw_triangle(
            MacroquadVec2::new(apex.x, apex.y),
            MacroquadVec2::new(left.x, left.y),
            MacroquadVec2::new(right.x, right.y),
            color,
        );
    }
}

fn draw_hud(hud: &HudPresentation, background: macroquad::color::Color) {
    let text_color = macroquad::color::Color::new(
        1.0 - background.r,
        1.0 - background.g,
        1.0 - background.b,
        1.0,
    );
    let _ = macroquad::text::draw_text(
        &hud.status_line(),
        16.0,
        HUD_FONT_SIZE + 8.0,
        HUD_FONT_SIZE,
        text_color,
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
