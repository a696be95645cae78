//! Host rules that translate player input into wave controller calls.

use log::trace;
use shadow_defend_core::Clock;
use shadow_defend_rendering::{FrameControl, FrameInput, HudPresentation, Scene};
use shadow_defend_world::{query, WaveController};

/// Drives a wave once per rendered frame.
#[derive(Debug)]
pub(crate) struct Host<C> {
    controller: WaveController<C>,
}

impl<C: Clock> Host<C> {
    pub(crate) fn new(controller: WaveController<C>) -> Self {
        Self { controller }
    }

    /// Applies the frame's input, runs one update and refreshes the scene.
    ///
    /// Start is honoured only before the wave started. Speed changes are
    /// honoured only after it started, and speed-up wins when both keys were
    /// pressed in the same frame. The run loop is asked to exit once the
    /// wave has finished.
    pub(crate) fn frame(&mut self, input: FrameInput, scene: &mut Scene) -> FrameControl {
        if input.start_wave && !self.controller.has_started() {
            self.controller.start();
        }

        if self.controller.has_started() {
            if input.speed_up {
                self.controller.speed_up();
            } else if input.slow_down {
                self.controller.slow_down();
            }
            self.controller.update();
        }

        for event in self.controller.drain_events() {
            trace!("{event:?}");
        }
        self.populate_scene(scene);

        if self.controller.is_finished() {
            FrameControl::Exit
        } else {
            FrameControl::Continue
        }
    }

    /// Copies the wave's current state into the scene.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        let slicers = self.controller.slicers();
        scene.hud = HudPresentation {
            status: self.controller.status(),
            time_scale: self.controller.time_scale().get(),
            remaining: query::remaining_to_spawn(self.controller.wave()),
            active: query::active_count(self.controller.wave()),
        };
        scene.sync_slicers(&slicers);
    }
}
