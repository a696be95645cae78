use std::vec::Drain;

use shadow_defend_core::{
    Clock, Command, Event, Path, SlicerView, SpawnInterval, TimeScale, WaveStatus,
};

use crate::{apply, query, Wave, WaveConfig};

/// Clock-driven facade over a [`Wave`].
///
/// Every call reads "now" from the injected clock, applies the matching
/// [`Command`] and buffers the resulting events until the host drains them.
/// Hosts that never call [`WaveController::drain_events`] keep every event
/// for the lifetime of the controller.
#[derive(Debug)]
pub struct WaveController<C> {
    wave: Wave,
    clock: C,
    events: Vec<Event>,
}

impl<C: Clock> WaveController<C> {
    /// Creates a controller for a new, not yet started wave.
    #[must_use]
    pub fn new(path: Path, config: WaveConfig, clock: C) -> Self {
        Self {
            wave: Wave::new(path, config),
            clock,
            events: Vec::new(),
        }
    }

    /// Starts the wave. Call only while [`Self::has_started`] is `false`.
    pub fn start(&mut self) {
        let now = self.clock.now();
        self.apply(Command::Start { now });
    }

    /// Runs one tick: spawn policy, movement sub-steps and retirement.
    ///
    /// Does nothing before [`Self::start`] or after the wave finished.
    pub fn update(&mut self) {
        let now = self.clock.now();
        self.apply(Command::Tick { now });
    }

    /// Raises the time-scale by one and halves the spawn interval.
    pub fn speed_up(&mut self) {
        self.apply(Command::SpeedUp);
    }

    /// Lowers the time-scale by one and doubles the spawn interval, unless
    /// the time-scale is already at its floor.
    pub fn slow_down(&mut self) {
        self.apply(Command::SlowDown);
    }

    /// Reports whether the wave has been started.
    #[must_use]
    pub fn has_started(&self) -> bool {
        query::has_started(&self.wave)
    }

    /// Reports whether the wave has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        query::is_finished(&self.wave)
    }

    /// Current lifecycle state of the wave.
    #[must_use]
    pub fn status(&self) -> WaveStatus {
        query::status(&self.wave)
    }

    /// Slicers that remain on the path after the most recent tick.
    #[must_use]
    pub fn slicers(&self) -> SlicerView {
        query::slicer_view(&self.wave)
    }

    /// Multiplier applied to movement sub-steps per tick.
    #[must_use]
    pub fn time_scale(&self) -> TimeScale {
        query::time_scale(&self.wave)
    }

    /// Delay between two scheduled spawns.
    #[must_use]
    pub fn spawn_interval(&self) -> SpawnInterval {
        query::spawn_interval(&self.wave)
    }

    /// Read-only access to the underlying wave for [`query`] functions.
    #[must_use]
    pub fn wave(&self) -> &Wave {
        &self.wave
    }

    /// Removes and yields the events buffered since the previous drain.
    pub fn drain_events(&mut self) -> Drain<'_, Event> {
        self.events.drain(..)
    }

    fn apply(&mut self, command: Command) {
        apply(&mut self.wave, command, &mut self.events);
    }
}
