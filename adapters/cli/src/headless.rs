//! Window-less rendering backend that replays scripted input at a fixed frame rate.

use std::{str::FromStr, time::Duration};

use anyhow::{bail, Result};
use log::info;
use shadow_defend_rendering::{FrameControl, FrameInput, Presentation, RenderingBackend, Scene};
use thiserror::Error;

/// Player action injected by a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Signal {
    Start,
    SpeedUp,
    SlowDown,
}

/// Signal delivered on a specific frame, written as `FRAME:SIGNAL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ScriptedSignal {
    frame: u64,
    signal: Signal,
}

impl ScriptedSignal {
    pub(crate) const fn new(frame: u64, signal: Signal) -> Self {
        Self { frame, signal }
    }
}

/// Reasons a `FRAME:SIGNAL` argument may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum SignalParseError {
    #[error("expected FRAME:SIGNAL, received '{0}'")]
    MissingSeparator(String),
    #[error("invalid frame number '{0}'")]
    InvalidFrame(String),
    #[error("unknown signal '{0}', expected start, speed-up or slow-down")]
    UnknownSignal(String),
}

impl FromStr for ScriptedSignal {
    type Err = SignalParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (frame, signal) = value
            .split_once(':')
            .ok_or_else(|| SignalParseError::MissingSeparator(value.to_owned()))?;
        let frame = frame
            .trim()
            .parse::<u64>()
            .map_err(|_| SignalParseError::InvalidFrame(frame.to_owned()))?;
        let signal = match signal.trim() {
            "start" => Signal::Start,
            "speed-up" => Signal::SpeedUp,
            "slow-down" => Signal::SlowDown,
            other => return Err(SignalParseError::UnknownSignal(other.to_owned())),
        };

        Ok(Self { frame, signal })
    }
}

/// Rendering backend that runs the scene update without opening a window.
#[derive(Clone, Debug)]
pub(crate) struct HeadlessBackend {
    frame_interval: Duration,
    max_frames: u64,
    script: Vec<ScriptedSignal>,
}

impl HeadlessBackend {
    /// Creates a backend ticking `frame_rate` times per simulated second.
    ///
    /// An empty script starts the wave on the first frame.
    pub(crate) fn new(frame_rate: u32, max_frames: u64, script: Vec<ScriptedSignal>) -> Self {
        let script = if script.is_empty() {
            vec![ScriptedSignal::new(0, Signal::Start)]
        } else {
            script
        };

        Self {
            frame_interval: Duration::from_secs(1) / frame_rate.max(1),
            max_frames,
            script,
        }
    }

    fn input_for(&self, frame: u64) -> FrameInput {
        self.script
            .iter()
            .filter(|scripted| scripted.frame == frame)
            .fold(FrameInput::default(), |mut input, scripted| {
                match scripted.signal {
                    Signal::Start => input.start_wave = true,
                    Signal::SpeedUp => input.speed_up = true,
                    Signal::SlowDown => input.slow_down = true,
                }
                input
            })
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameControl + 'static,
    {
        let mut scene = presentation.scene;

        for frame in 0..self.max_frames {
            let input = self.input_for(frame);
            if update_scene(self.frame_interval, input, &mut scene) == FrameControl::Exit {
                info!(
                    "headless run finished after {} frames ({:?} simulated)",
                    frame + 1,
                    self.frame_interval * u32::try_from(frame + 1).unwrap_or(u32::MAX)
                );
                return Ok(());
            }
        }

        bail!(
            "wave did not finish within {} frames ({})",
            self.max_frames,
            scene.hud.status_line()
        )
    }
}
