use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use glam::DVec2;
use shadow_defend_core::{Command, Event, Path, SlicerSnapshot, SpawnInterval, Timestamp};
use shadow_defend_system_movement::Config as MovementConfig;
use shadow_defend_system_spawning::Config as SpawningConfig;
use shadow_defend_world::{self as world, query, Wave, WaveConfig};

#[test]
fn deterministic_replay_produces_identical_sequence() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn scripted_replay_spawns_and_retires_the_whole_quota() {
    let outcome = replay(scripted_commands());

    let spawned = outcome
        .events
        .iter()
        .filter(|record| matches!(record, EventRecord::Spawned { .. }))
        .count();
    let completed = outcome
        .events
        .iter()
        .filter(|record| matches!(record, EventRecord::Completed { .. }))
        .count();

    assert_eq!(spawned, 4);
    assert_eq!(completed, 4);
    assert_eq!(outcome.events.last(), Some(&EventRecord::Finished));
    assert!(outcome.slicers.is_empty());
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let path = Path::new(vec![
        DVec2::new(0.0, 0.0),
        DVec2::new(12.5, 0.0),
        DVec2::new(12.5, 7.25),
        DVec2::new(30.0, 7.25),
    ])
    .expect("valid path");
    let config = WaveConfig::new(
        4,
        SpawningConfig::new(SpawnInterval::from_duration(Duration::from_millis(120))),
        MovementConfig::default(),
    );
    let mut wave = Wave::new(path, config);
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut wave, command, &mut events);
        log.extend(events.iter().map(EventRecord::from));
    }

    let slicers = query::slicer_view(&wave)
        .into_vec()
        .into_iter()
        .map(SlicerState::from)
        .collect();

    ReplayOutcome {
        slicers,
        events: log,
    }
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::Tick {
            now: Timestamp::ZERO,
        },
        Command::Start {
            now: Timestamp::ZERO,
        },
    ];

    for frame in 0..400_u64 {
        let now = Timestamp::from_offset(Duration::from_millis(frame * 16));
        if frame == 10 {
            commands.push(Command::SpeedUp);
        }
        if frame == 30 {
            commands.push(Command::SlowDown);
            commands.push(Command::SlowDown);
        }
        commands.push(Command::Tick { now });
    }

    commands
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    slicers: Vec<SlicerState>,
    events: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum EventRecord {
    Started,
    Spawned { slicer: u32, x: u64, y: u64 },
    Completed { slicer: u32 },
    TimeScale { scale: u32, interval_nanos: u64 },
    Finished,
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        match *event {
            Event::WaveStarted => Self::Started,
            Event::SlicerSpawned { slicer, position } => Self::Spawned {
                slicer: slicer.get(),
                x: position.x.to_bits(),
                y: position.y.to_bits(),
            },
            Event::SlicerCompleted { slicer } => Self::Completed {
                slicer: slicer.get(),
            },
            Event::TimeScaleChanged {
                time_scale,
                spawn_interval,
            } => Self::TimeScale {
                scale: time_scale.get(),
                interval_nanos: spawn_interval.as_nanos(),
            },
            Event::WaveFinished => Self::Finished,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SlicerState {
    id: u32,
    x: u64,
    y: u64,
    heading: u64,
    target_index: usize,
}

impl From<SlicerSnapshot> for SlicerState {
    fn from(snapshot: SlicerSnapshot) -> Self {
        Self {
            id: snapshot.id.get(),
            x: snapshot.position.x.to_bits(),
            y: snapshot.position.y.to_bits(),
            heading: snapshot.heading.to_bits(),
            target_index: snapshot.target_index,
        }
    }
}
