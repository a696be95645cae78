#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Shadow Defend adapters.

use anyhow::Result as AnyResult;
use glam::{DVec2, Vec2};
use shadow_defend_core::{SlicerId, SlicerSnapshot, SlicerView, WaveStatus};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Edge-triggered control signals gathered by adapters before updating the scene.
///
/// Each flag is `true` on exactly one frame per physical key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// The player asked to start the wave.
    pub start_wave: bool,
    /// The player asked to speed the wave up.
    pub speed_up: bool,
    /// The player asked to slow the wave down.
    pub slow_down: bool,
}

/// Decision returned by the scene update on every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameControl {
    /// Keep presenting frames.
    Continue,
    /// Stop the run loop and close the window.
    Exit,
}

/// Polyline that slicers travel along, in world units.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPresentation {
    /// Waypoints in travel order.
    pub waypoints: Vec<Vec2>,
    /// Width of the drawn track.
    pub thickness: f32,
    /// Color of the drawn track.
    pub color: Color,
}

impl PathPresentation {
    /// Creates a new path descriptor from simulation waypoints.
    ///
    /// Returns an error when `thickness` is not a positive number.
    pub fn new(
        waypoints: &[DVec2],
        thickness: f32,
        color: Color,
    ) -> std::result::Result<Self, RenderingError> {
        if !(thickness > 0.0) {
            return Err(RenderingError::InvalidPathThickness { thickness });
        }

        Ok(Self {
            waypoints: waypoints.iter().map(|point| point.as_vec2()).collect(),
            thickness,
            color,
        })
    }

    /// Axis-aligned bounds of the waypoints as `(min, max)`, if any.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let first = *self.waypoints.first()?;
        Some(
            self.waypoints
                .iter()
                .fold((first, first), |(min, max), point| {
                    (min.min(*point), max.max(*point))
                }),
        )
    }
}

/// Slicer drawn at its simulated position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlicerPresentation {
    /// Identifier of the slicer.
    pub id: SlicerId,
    /// Position in world units.
    pub position: Vec2,
    /// Rotation of the sprite in radians.
    pub heading: f32,
}

impl From<&SlicerSnapshot> for SlicerPresentation {
    fn from(snapshot: &SlicerSnapshot) -> Self {
        Self {
            id: snapshot.id,
            position: snapshot.position.as_vec2(),
            heading: snapshot.heading as f32,
        }
    }
}

/// Status overlay describing the wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudPresentation {
    /// Lifecycle state of the wave.
    pub status: WaveStatus,
    /// Active time-scale multiplier.
    pub time_scale: u32,
    /// Slicers still waiting to spawn.
    pub remaining: u32,
    /// Slicers currently on the path.
    pub active: usize,
}

impl HudPresentation {
    /// Single-line summary suitable for an overlay or a log line.
    #[must_use]
    pub fn status_line(&self) -> String {
        let status = match self.status {
            WaveStatus::NotStarted => "press S to start",
            WaveStatus::Running => "running",
            WaveStatus::Finished => "finished",
        };
        format!(
            "wave {status} | speed x{} | on path {} | waiting {}",
            self.time_scale, self.active, self.remaining
        )
    }
}

impl Default for HudPresentation {
    fn default() -> Self {
        Self {
            status: WaveStatus::NotStarted,
            time_scale: 1,
            remaining: 0,
            active: 0,
        }
    }
}

/// Scene description combining the path, its slicers and the overlay.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Track drawn underneath the slicers.
    pub path: PathPresentation,
    /// Slicers that remain on the path after the latest tick.
    pub slicers: Vec<SlicerPresentation>,
    /// Wave status overlay.
    pub hud: HudPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(path: PathPresentation, slicers: Vec<SlicerPresentation>, hud: HudPresentation) -> Self {
        Self { path, slicers, hud }
    }

    /// Replaces the drawn slicers with the provided simulation view.
    pub fn sync_slicers(&mut self, view: &SlicerView) {
        self.slicers.clear();
        self.slicers.extend(view.iter().map(SlicerPresentation::from));
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Shadow Defend scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, may mutate the scene before it
    /// is rendered, and decides whether the loop keeps running.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameControl + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Track thickness must be positive to be visible.
    InvalidPathThickness {
        /// Provided thickness that failed validation.
        thickness: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPathThickness { thickness } => {
                write!(f, "path thickness must be positive (received {thickness})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> PathPresentation {
        PathPresentation::new(
            &[
                DVec2::new(0.0, 384.0),
                DVec2::new(500.0, 100.0),
                DVec2::new(900.0, 700.0),
            ],
            12.0,
            Color::from_rgb_u8(120, 100, 80),
        )
        .expect("positive thickness")
    }

    #[test]
    fn path_presentation_rejects_zero_thickness() {
        let error = PathPresentation::new(&[DVec2::ZERO], 0.0, Color::from_rgb_u8(0, 0, 0))
            .expect_err("zero thickness must be rejected");

        assert_eq!(
            error,
            RenderingError::InvalidPathThickness { thickness: 0.0 }
        );
    }

    #[test]
    fn path_bounds_cover_every_waypoint() {
        let bounds = track().bounds().expect("non-empty track");

        assert_eq!(bounds, (Vec2::new(0.0, 100.0), Vec2::new(900.0, 700.0)));
    }

    #[test]
    fn sync_slicers_mirrors_the_view_in_id_order() {
        let mut scene = Scene::new(track(), Vec::new(), HudPresentation::default());
        let view = SlicerView::from_snapshots(vec![
            SlicerSnapshot {
                id: SlicerId::new(4),
                position: DVec2::new(3.0, 4.0),
                heading: 0.5,
                target_index: 1,
            },
            SlicerSnapshot {
                id: SlicerId::new(2),
                position: DVec2::new(1.0, 2.0),
                heading: 0.0,
                target_index: 0,
            },
        ]);

        scene.sync_slicers(&view);

        let ids: Vec<_> = scene.slicers.iter().map(|slicer| slicer.id.get()).collect();
        assert_eq!(ids, vec![2, 4]);
        assert_eq!(scene.slicers[1].position, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn status_line_reports_speed_and_population() {
        let hud = HudPresentation {
            status: WaveStatus::Running,
            time_scale: 3,
            remaining: 2,
            active: 1,
        };

        assert_eq!(
            hud.status_line(),
            "wave running | speed x3 | on path 1 | waiting 2"
        );
    }

    #[test]
    fn lighten_moves_channels_towards_white() {
        let color = Color::new(0.0, 0.5, 1.0, 0.25).lighten(0.5);

        assert!((color.red - 0.5).abs() < f32::EPSILON);
        assert!((color.green - 0.75).abs() < f32::EPSILON);
        assert!((color.blue - 1.0).abs() < f32::EPSILON);
        assert!((color.alpha - 0.25).abs() < f32::EPSILON);
    }
}
